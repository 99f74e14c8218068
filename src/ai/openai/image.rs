use super::client::OpenAiHttpClient;
use super::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::ai::{mime, ImageGenerationService, ImagePrompt, ProviderResult};
use crate::error::ProviderError;
use async_trait::async_trait;
use std::time::Duration;

pub struct OpenAiImageClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, Duration::from_secs(60), client),
            model,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl ImageGenerationService for OpenAiImageClient {
    async fn generate_image(&self, prompt: &ImagePrompt) -> ProviderResult<String> {
        let request = ImageGenerationRequest {
            model: self.model.clone(),
            prompt: prompt.prompt.clone(),
            n: prompt.n,
            size: prompt.size.clone(),
            quality: prompt.quality.clone(),
            style: prompt.style.clone(),
        };

        tracing::debug!(
            "Sending image generation request to OpenAI (model: {})",
            request.model
        );

        let response: ImageGenerationResponse =
            self.http.post("/v1/images/generations", &request).await?;

        let image_data = response.data.into_iter().next().ok_or_else(|| {
            ProviderError::Other("No image data in OpenAI response".to_string())
        })?;

        if let Some(url) = image_data.url {
            Ok(url)
        } else if let Some(b64_json) = image_data.b64_json {
            data_uri(&b64_json)
        } else {
            Err(ProviderError::Other(
                "No image data (neither URL nor base64) in response".to_string(),
            ))
        }
    }
}

/// Wrap a base64 image payload in a `data:` URI, sniffing its MIME type.
fn data_uri(b64_json: &str) -> ProviderResult<String> {
    use base64::Engine as _;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(b64_json)
        .map_err(|e| ProviderError::Other(format!("Failed to decode base64 image: {}", e)))?;
    let mime = mime::detect_image_mime(&bytes);
    Ok(format!("data:{};base64,{}", mime, b64_json))
}
