//! Message classification types.

use serde::{Deserialize, Serialize};

/// Classification of a message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Default for Severity {
    fn default() -> Self {
        Self::Info
    }
}

/// Visual tone of a dialog. Superset of [`Severity`] with a question tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogTone {
    Success,
    Info,
    Warning,
    Error,
    Question,
}

impl From<Severity> for DialogTone {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Success => DialogTone::Success,
            Severity::Info => DialogTone::Info,
            Severity::Warning => DialogTone::Warning,
            Severity::Error => DialogTone::Error,
        }
    }
}

#[cfg(test)]
#[path = "common_tests.rs"]
mod tests;
