//! External AI text service trait.

use async_trait::async_trait;

use crate::error::AiError;

/// Single request/response text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Identifier used in logs.
    fn id(&self) -> &str;

    /// Send `prompt` and return the generated text, trimmed.
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}
