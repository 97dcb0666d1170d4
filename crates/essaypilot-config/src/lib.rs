//! # essaypilot Config
//!
//! Configuration management: TOML schema with defaults for every field,
//! `${VAR}` expansion on load, and validation with errors and warnings.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
