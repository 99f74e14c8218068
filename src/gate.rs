//! Request validation and provider error classification
//!
//! [`RequestGate`] is the single place where both operations check their
//! input, check that a credential is configured, call the provider and turn
//! provider failures into caller-facing errors. Every check short-circuits, and
//! validation always runs before anything touches the network.

use crate::ai::{ChatService, ChatTurn, Conversation, ImageGenerationService, ImagePrompt};
use crate::error::ProviderError;
use crate::models::{AnalysisRequest, AnalysisResponse, PortraitRequest, PortraitResponse};
use crate::prompts;
use axum::http::StatusCode;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub const ANALYSIS_TEMPERATURE: f64 = 0.7;
pub const ANALYSIS_MAX_TOKENS: u32 = 900;
pub const PORTRAIT_SIZE: &str = "1024x1024";
pub const PORTRAIT_QUALITY: &str = "standard";
pub const PORTRAIT_STYLE: &str = "natural";

const ANALYSIS_FIELDS_MISSING: &str =
    "Missing required fields: systemMessage, developerMessage, userMessage";
const PORTRAIT_FIELD_MISSING: &str = "Missing required field: description";

/// Which gate operation an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Analyze,
    Portrait,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Analyze => f.write_str("analyze personality"),
            Operation::Portrait => f.write_str("generate portrait"),
        }
    }
}

/// Outcome of a rejected gate call. `Display` is the caller-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("{0}")]
    Validation(String),

    #[error("OpenAI API key not configured. Please set OPENAI_API_KEY environment variable.")]
    Config,

    #[error("OpenAI API quota exceeded. Please check your billing.")]
    Quota,

    #[error("Invalid OpenAI API key. Please check your configuration.")]
    Auth,

    #[error("Portrait description violates content policy. Please try a different description.")]
    ContentPolicy,

    #[error("Failed to {0}. Please try again later.")]
    Provider(Operation),
}

impl GateError {
    /// Map a provider failure for `operation`.
    ///
    /// Content-policy rejections only have their own kind for portraits; for
    /// analysis they are an ordinary provider failure.
    pub fn classify(operation: Operation, error: &ProviderError) -> Self {
        match (error, operation) {
            (ProviderError::Quota(_), _) => GateError::Quota,
            (ProviderError::AuthInvalid(_), _) => GateError::Auth,
            (ProviderError::ContentPolicy(_), Operation::Portrait) => GateError::ContentPolicy,
            _ => GateError::Provider(operation),
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GateError::Validation(_) => StatusCode::BAD_REQUEST,
            GateError::Config => StatusCode::INTERNAL_SERVER_ERROR,
            GateError::Quota => StatusCode::PAYMENT_REQUIRED,
            GateError::Auth => StatusCode::UNAUTHORIZED,
            GateError::ContentPolicy => StatusCode::BAD_REQUEST,
            GateError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct RequestGate {
    api_key: Option<String>,
    chat: Arc<dyn ChatService>,
    image: Arc<dyn ImageGenerationService>,
}

impl RequestGate {
    pub fn new(
        api_key: Option<String>,
        chat: Arc<dyn ChatService>,
        image: Arc<dyn ImageGenerationService>,
    ) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.is_empty()),
            chat,
            image,
        }
    }

    /// Whether a provider credential was supplied at startup.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn require_credential(&self, operation: Operation) -> Result<(), GateError> {
        if self.is_configured() {
            Ok(())
        } else {
            tracing::error!("Cannot {}: OPENAI_API_KEY is not set", operation);
            Err(GateError::Config)
        }
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, GateError> {
        let AnalysisRequest {
            system_message,
            developer_message,
            user_message,
            trait_scores,
        } = request;

        let (system_message, developer_message, user_message) = match (
            non_empty(system_message),
            non_empty(developer_message),
            non_empty(user_message),
        ) {
            (Some(system), Some(developer), Some(user)) => (system, developer, user),
            _ => {
                tracing::warn!("Rejected analysis request with missing fields");
                return Err(GateError::Validation(ANALYSIS_FIELDS_MISSING.to_string()));
            }
        };

        self.require_credential(Operation::Analyze)?;

        let conversation = Conversation {
            turns: vec![
                ChatTurn::system(system_message),
                ChatTurn::user(prompts::analysis_user_turn(&developer_message, &user_message)),
            ],
            temperature: ANALYSIS_TEMPERATURE,
            max_tokens: ANALYSIS_MAX_TOKENS,
        };

        let analysis = self.chat.complete(&conversation).await.map_err(|e| {
            let classified = GateError::classify(Operation::Analyze, &e);
            tracing::error!("Error calling OpenAI API: {} (returning {:?})", e, classified);
            classified
        })?;

        tracing::info!("Personality analysis generated ({} chars)", analysis.len());

        Ok(AnalysisResponse {
            success: true,
            analysis,
            trait_scores,
        })
    }

    pub async fn portrait(&self, request: PortraitRequest) -> Result<PortraitResponse, GateError> {
        let Some(description) = non_empty(request.description) else {
            tracing::warn!("Rejected portrait request without a description");
            return Err(GateError::Validation(PORTRAIT_FIELD_MISSING.to_string()));
        };

        self.require_credential(Operation::Portrait)?;

        let prompt = ImagePrompt {
            prompt: prompts::portrait(&description),
            n: 1,
            size: PORTRAIT_SIZE.to_string(),
            quality: PORTRAIT_QUALITY.to_string(),
            style: PORTRAIT_STYLE.to_string(),
        };

        let image_url = self.image.generate_image(&prompt).await.map_err(|e| {
            let classified = GateError::classify(Operation::Portrait, &e);
            tracing::error!("Error generating portrait: {} (returning {:?})", e, classified);
            classified
        })?;

        tracing::info!("Portrait generated");

        Ok(PortraitResponse {
            success: true,
            image_url,
            description,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
