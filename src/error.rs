//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

/// Failure reported by an AI provider, tagged by what the provider said went wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider quota exhausted: {0}")]
    Quota(String),

    #[error("Provider rejected the API key: {0}")]
    AuthInvalid(String),

    #[error("Provider rejected the prompt content: {0}")]
    ContentPolicy(String),

    #[error("Provider request failed: {0}")]
    Other(String),
}

impl ProviderError {
    /// Classify an OpenAI error `code` field, keeping `detail` for logs.
    pub fn from_code(code: Option<&str>, detail: String) -> Self {
        match code {
            Some("insufficient_quota") => Self::Quota(detail),
            Some("invalid_api_key") => Self::AuthInvalid(detail),
            Some("content_policy_violation") => Self::ContentPolicy(detail),
            _ => Self::Other(detail),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
