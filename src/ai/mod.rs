//! AI service integration for personality analysis and portrait generation
//!
//! Provides interfaces to OpenAI's Chat Completions and Image APIs. The gate
//! only ever talks to the traits below, so tests swap in the mock clients.

pub mod mime;
pub mod mock;
pub mod openai;

pub use mock::{MockChatClient, MockImageGenerationClient};
pub use openai::{OpenAiChatClient, OpenAiImageClient};

use crate::error::ProviderError;
use async_trait::async_trait;

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// One turn of a chat conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Conversation plus sampling settings handed to a [`ChatService`].
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub turns: Vec<ChatTurn>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Image generation settings handed to an [`ImageGenerationService`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePrompt {
    pub prompt: String,
    pub n: u32,
    pub size: String,
    pub quality: String,
    pub style: String,
}

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Returns the text of the first generated message.
    async fn complete(&self, conversation: &Conversation) -> ProviderResult<String>;
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Returns a URI for the first generated image.
    async fn generate_image(&self, prompt: &ImagePrompt) -> ProviderResult<String>;
}
