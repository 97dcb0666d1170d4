//! Chat-completions provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use essaypilot_config::AiConfig;
use essaypilot_protocols::{AiError, TextGenerator};

use crate::api::ApiRequest;
use crate::shape::extract_text;

/// Text generator speaking the chat-completions wire format.
pub struct ChatProvider {
    api_url: String,
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
}

impl ChatProvider {
    pub fn new(api_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: None,
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to the default HTTP client: {}", e);
                reqwest::Client::new()
            });
        self
    }

    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        if config.api_url.trim().is_empty() {
            return Err(AiError::NotConfigured("ai.api_url is empty".to_string()));
        }

        let mut provider = Self::new(config.api_url.clone(), config.model.clone())
            .with_timeout(Duration::from_secs(config.timeout_secs));
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            provider = provider.with_api_key(key);
        }
        Ok(provider)
    }

    async fn send_request(&self, request: &ApiRequest) -> Result<String, AiError> {
        let mut builder = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(AiError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }
        Ok(text)
    }
}

/// Body as JSON, or the raw text as a bare string.
fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[async_trait]
impl TextGenerator for ChatProvider {
    fn id(&self) -> &str {
        "chat"
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        if prompt.trim().is_empty() {
            return Err(AiError::EmptyInput("prompt".to_string()));
        }

        debug!(
            "Sending {} prompt chars to {} ({})",
            prompt.chars().count(),
            self.api_url,
            self.model
        );
        let request = ApiRequest::user(&self.model, prompt);
        let body = self.send_request(&request).await?;
        extract_text(&parse_body(&body))
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
