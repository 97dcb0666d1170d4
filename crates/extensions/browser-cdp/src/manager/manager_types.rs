//! Browser manager errors and their mapping onto the page and surface
//! error types.

use thiserror::Error;

use essaypilot_protocols::{DecisionError, PageError};

use crate::cdp::CdpError;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("No open tab matches {0}")]
    PageNotFound(String),

    #[error("Page script failed: {0}")]
    ScriptFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Browser not connected")]
    NotConnected,

    #[error("Chrome not found. Please install Google Chrome.")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),
}

impl From<CdpError> for BrowserError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ConnectionFailed(msg) => BrowserError::ConnectionFailed(msg),
            CdpError::ChromeNotAvailable(msg) => BrowserError::ConnectionFailed(msg),
            CdpError::JavaScript(msg) => BrowserError::ScriptFailed(msg),
            CdpError::Timeout(msg) => BrowserError::Timeout(msg),
            CdpError::InvalidResponse(msg) => BrowserError::InvalidResponse(msg),
            CdpError::Serialization(e) => BrowserError::InvalidResponse(e.to_string()),
            CdpError::SessionClosed => BrowserError::NotConnected,
            _ => BrowserError::ConnectionFailed(e.to_string()),
        }
    }
}

impl From<BrowserError> for PageError {
    fn from(e: BrowserError) -> Self {
        match e {
            BrowserError::ScriptFailed(msg) => PageError::Script(msg),
            BrowserError::InvalidResponse(msg) => PageError::InvalidResponse(msg),
            other => PageError::Transport(other.to_string()),
        }
    }
}

impl From<BrowserError> for DecisionError {
    fn from(e: BrowserError) -> Self {
        match e {
            BrowserError::NotConnected => DecisionError::SurfaceClosed,
            other => DecisionError::Surface(other.to_string()),
        }
    }
}
