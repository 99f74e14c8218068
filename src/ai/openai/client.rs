use super::types::{ApiErrorEnvelope, ChatCompletionRequest, ChatCompletionResponse};
use crate::ai::ProviderResult;
use crate::error::ProviderError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Thin OpenAI REST client shared by the chat and image modules.
pub struct OpenAiHttpClient {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    timeout: Duration,
}

impl OpenAiHttpClient {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, timeout, Client::new())
    }

    pub fn new_with_client(api_key: String, timeout: Duration, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub async fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        request: &Req,
    ) -> ProviderResult<Resp> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to OpenAI: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("OpenAI API error (status {}): {}", status, error_text);
            return Err(classify_error_body(status.as_u16(), &error_text));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse OpenAI response: {}\nBody: {}", e, body);
            ProviderError::Other(format!("Failed to parse OpenAI response: {}", e))
        })
    }

    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> ProviderResult<ChatCompletionResponse> {
        self.post("/v1/chat/completions", request).await
    }
}

/// Map a non-2xx OpenAI body onto [`ProviderError`].
///
/// OpenAI normally reports the reason in `error.code`, but quota failures
/// have been seen with a null code and the reason in `error.type`.
fn classify_error_body(status: u16, body: &str) -> ProviderError {
    let detail = format!("OpenAI API error (status {}): {}", status, body);
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => {
            let code = envelope
                .error
                .code
                .as_deref()
                .or(envelope.error.error_type.as_deref());
            ProviderError::from_code(code, detail)
        }
        Err(_) => ProviderError::Other(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_error_body_uses_code() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","code":"invalid_api_key"}}"#;
        assert!(matches!(
            classify_error_body(401, body),
            ProviderError::AuthInvalid(_)
        ));
    }

    #[test]
    fn test_classify_error_body_falls_back_to_type() {
        let body = r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota","code":null}}"#;
        assert!(matches!(
            classify_error_body(429, body),
            ProviderError::Quota(_)
        ));
    }

    #[test]
    fn test_classify_error_body_non_json() {
        let err = classify_error_body(502, "bad gateway");
        assert_eq!(
            err,
            ProviderError::Other("OpenAI API error (status 502): bad gateway".to_string())
        );
    }

    #[test]
    fn test_with_base_url_strips_trailing_slash() {
        let client = OpenAiHttpClient::new("key".to_string(), Duration::from_secs(1))
            .with_base_url("http://localhost:9999/".to_string());
        assert_eq!(client.base_url, "http://localhost:9999");
    }
}
