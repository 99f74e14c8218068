use super::{ChatService, Conversation, ImageGenerationService, ImagePrompt, ProviderResult};
use crate::error::ProviderError;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// In-memory [`ChatService`] that records every conversation it receives.
#[derive(Clone)]
pub struct MockChatClient {
    responses: Arc<Mutex<Vec<String>>>,
    failure: Arc<Mutex<Option<ProviderError>>>,
    requests: Arc<Mutex<Vec<Conversation>>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(response.into());
        self
    }

    /// Every call fails with `error` instead of answering.
    pub fn with_failure(self, error: ProviderError) -> Self {
        *self.failure.lock().unwrap() = Some(error);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Conversation> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn complete(&self, conversation: &Conversation) -> ProviderResult<String> {
        let count = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(conversation.clone());
            requests.len()
        };

        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("A thoughtful, curious and warm personality.".to_string())
        } else {
            let index = (count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}

/// In-memory [`ImageGenerationService`] that records every prompt it receives.
#[derive(Clone)]
pub struct MockImageGenerationClient {
    urls: Arc<Mutex<Vec<String>>>,
    failure: Arc<Mutex<Option<ProviderError>>>,
    requests: Arc<Mutex<Vec<ImagePrompt>>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            urls: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_image_url(self, url: impl Into<String>) -> Self {
        self.urls.lock().unwrap().push(url.into());
        self
    }

    /// Every call fails with `error` instead of answering.
    pub fn with_failure(self, error: ProviderError) -> Self {
        *self.failure.lock().unwrap() = Some(error);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ImagePrompt> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_image(&self, prompt: &ImagePrompt) -> ProviderResult<String> {
        let count = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(prompt.clone());
            requests.len()
        };

        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }

        let urls = self.urls.lock().unwrap();
        if urls.is_empty() {
            Ok("https://images.example.com/portrait.png".to_string())
        } else {
            let index = (count - 1) % urls.len();
            Ok(urls[index].clone())
        }
    }
}
