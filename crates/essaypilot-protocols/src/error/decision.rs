//! Decision surface errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("A decision is already pending")]
    AlreadyPending,

    #[error("Decision surface is not open")]
    SurfaceClosed,

    #[error("Decision surface failed: {0}")]
    Surface(String),
}
