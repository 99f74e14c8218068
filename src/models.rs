//! Data models and structures
//!
//! Request and response envelopes for the HTTP API, plus the process
//! configuration read from the environment.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

/// Body of `POST /api/analyze-personality`.
///
/// `trait_scores` is carried through untouched; an absent field is echoed
/// back as `null`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub system_message: Option<String>,
    pub developer_message: Option<String>,
    pub user_message: Option<String>,
    #[serde(default)]
    pub trait_scores: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub success: bool,
    pub analysis: String,
    pub trait_scores: Value,
}

/// Body of `POST /api/generate-portrait`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortraitRequest {
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortraitResponse {
    pub success: bool,
    pub image_url: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub openai_configured: bool,
}

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub host: String,
    pub port: u16,
    pub chat_model: String,
    pub image_model: String,
    pub openai_base_url: String,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                crate::Error::Config(format!("PORT must be a port number, got '{}'", raw))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            openai_api_key: get("OPENAI_API_KEY"),
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            chat_model: get("OPENAI_CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            image_model: get("OPENAI_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| crate::ai::openai::client::DEFAULT_BASE_URL.to_string()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.chat_model, "gpt-4o-mini");
        assert_eq!(config.image_model, "dall-e-3");
        assert_eq!(config.openai_base_url, "https://api.openai.com");
    }

    #[test]
    fn test_config_reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("PORT", "8080"),
            ("OPENAI_CHAT_MODEL", "gpt-4o"),
        ]))
        .unwrap();
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.chat_model, "gpt-4o");
    }

    #[test]
    fn test_config_empty_key_is_unset() {
        let config = Config::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn test_config_rejects_bad_port() {
        let err = Config::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_analysis_request_camel_case_and_null_scores() {
        let request: AnalysisRequest = serde_json::from_str(
            r#"{"systemMessage":"s","developerMessage":"d","userMessage":"u"}"#,
        )
        .unwrap();
        assert_eq!(request.system_message.as_deref(), Some("s"));
        assert_eq!(request.trait_scores, Value::Null);
    }

    #[test]
    fn test_portrait_response_field_names() {
        let json = serde_json::to_value(PortraitResponse {
            success: true,
            image_url: "https://img/1".to_string(),
            description: "calm".to_string(),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": true, "imageUrl": "https://img/1", "description": "calm" })
        );
    }
}
