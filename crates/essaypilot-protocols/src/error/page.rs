//! Host page errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Element not attached to the document: {0}")]
    Detached(String),

    #[error("Page script failed: {0}")]
    Script(String),

    #[error("Page transport failed: {0}")]
    Transport(String),

    #[error("Invalid page response: {0}")]
    InvalidResponse(String),
}

impl PageError {
    /// True when the error means the addressed element is gone.
    pub fn is_detached(&self) -> bool {
        matches!(self, PageError::Detached(_))
    }
}
