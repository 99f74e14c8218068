use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage};
use crate::ai::{ChatService, Conversation, ProviderResult};
use crate::error::ProviderError;
use async_trait::async_trait;
use std::time::Duration;

pub struct OpenAiChatClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiChatClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, Duration::from_secs(30), client),
            model,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl ChatService for OpenAiChatClient {
    async fn complete(&self, conversation: &Conversation) -> ProviderResult<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: conversation
                .turns
                .iter()
                .map(|turn| ChatMessage {
                    role: turn.role.clone(),
                    content: Some(turn.content.clone()),
                })
                .collect(),
            temperature: conversation.temperature,
            max_tokens: conversation.max_tokens,
        };

        tracing::debug!(
            "Sending chat completion request to OpenAI (model: {}, {} messages)",
            request.model,
            request.messages.len()
        );

        let response = self.http.chat_completion(&request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::Other("No response from OpenAI chat API".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ChatTurn;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn conversation() -> Conversation {
        Conversation {
            turns: vec![
                ChatTurn::system("You are a personality analyst."),
                ChatTurn::user("Be concise.\n\nMy scores are attached."),
            ],
            temperature: 0.7,
            max_tokens: 900,
        }
    }

    #[tokio::test]
    async fn test_complete_parses_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": "You are curious and open to experience."
                    },
                    "finish_reason": "stop"
                }]
            })))
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new("test-key".to_string(), "gpt-4o-mini".to_string())
            .with_base_url(server.uri());

        let text = client.complete(&conversation()).await.unwrap();
        assert_eq!(text, "You are curious and open to experience.");
    }

    #[tokio::test]
    async fn test_complete_sends_model_messages_and_sampling() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "custom-model",
                "messages": [
                    { "role": "system", "content": "You are a personality analyst." },
                    { "role": "user", "content": "Be concise.\n\nMy scores are attached." }
                ],
                "temperature": 0.7,
                "max_tokens": 900
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "ok" },
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new("key".to_string(), "custom-model".to_string())
            .with_base_url(server.uri());

        client.complete(&conversation()).await.unwrap();
    }

    #[tokio::test]
    async fn test_quota_error_is_tagged() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {
                    "message": "You exceeded your current quota.",
                    "type": "insufficient_quota",
                    "code": "insufficient_quota"
                }
            })))
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new("key".to_string(), "gpt-4o-mini".to_string())
            .with_base_url(server.uri());

        let err = client.complete(&conversation()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Quota(_)));
    }

    #[tokio::test]
    async fn test_invalid_key_error_is_tagged() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {
                    "message": "Incorrect API key provided.",
                    "type": "invalid_request_error",
                    "code": "invalid_api_key"
                }
            })))
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new("bad".to_string(), "gpt-4o-mini".to_string())
            .with_base_url(server.uri());

        let err = client.complete(&conversation()).await.unwrap_err();
        assert!(matches!(err, ProviderError::AuthInvalid(_)));
    }

    #[tokio::test]
    async fn test_rate_limit_falls_through_to_other() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new("key".to_string(), "gpt-4o-mini".to_string())
            .with_base_url(server.uri());

        let err = client.complete(&conversation()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Other(_)));
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new("key".to_string(), "gpt-4o-mini".to_string())
            .with_base_url(server.uri());

        let err = client.complete(&conversation()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Other(_)));
    }
}
