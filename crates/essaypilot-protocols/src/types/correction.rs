//! Correction data model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How markers are resolved during a correction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrectionMode {
    /// Fully automatic: first suggestion or skip, no per-error UI.
    Basic,
    /// Per-error interactive decision surface.
    Advanced,
}

impl CorrectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionMode::Basic => "basic",
            CorrectionMode::Advanced => "advanced",
        }
    }
}

impl fmt::Display for CorrectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(CorrectionMode::Basic),
            "advanced" => Ok(CorrectionMode::Advanced),
            other => Err(format!("unknown correction mode: {}", other)),
        }
    }
}

/// Decided fate of one marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// User picked one of the offered suggestions.
    Suggestion(String),
    /// User typed a replacement.
    Manual(String),
    /// Leave the marker as is.
    Skip,
    /// Replacement taken without asking.
    Auto(String),
    /// Marker could not be resolved.
    Error,
}

impl Resolution {
    /// Replacement text, for the kinds that carry one.
    pub fn replacement(&self) -> Option<&str> {
        match self {
            Resolution::Suggestion(v) | Resolution::Manual(v) | Resolution::Auto(v) => Some(v),
            Resolution::Skip | Resolution::Error => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Resolution::Suggestion(_) => "suggestion",
            Resolution::Manual(_) => "manual",
            Resolution::Skip => "skip",
            Resolution::Auto(_) => "auto",
            Resolution::Error => "error",
        }
    }
}

/// Words surrounding one error in the text buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorContext {
    pub before: String,
    pub error: String,
    pub after: String,
}

/// Where AI-generated text goes in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    Append,
    Replace,
    Cancel,
}

#[cfg(test)]
#[path = "correction_tests.rs"]
mod tests;
