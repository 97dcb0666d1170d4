//! AI text service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI service not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected AI response shape: {0}")]
    UnrecognizedShape(String),

    #[error("Nothing to send: {0}")]
    EmptyInput(String),
}
