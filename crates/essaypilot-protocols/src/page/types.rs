//! Host page data types.

use serde::{Deserialize, Serialize};

/// Presence of the first element matching a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// No element matches.
    Absent,
    /// An element matches but has no layout box.
    Hidden,
    /// An element matches and is rendered.
    Rendered,
}

impl Presence {
    pub fn exists(&self) -> bool {
        !matches!(self, Presence::Absent)
    }
}

/// Snapshot of one error marker at one instant.
///
/// Stale as soon as the text buffer changes; re-query instead of caching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSnapshot {
    /// Text content exactly as rendered, surrounding whitespace included.
    pub raw_text: String,
    pub visible: bool,
    pub attached: bool,
}

impl MarkerSnapshot {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            visible: true,
            attached: true,
        }
    }

    pub fn trimmed(&self) -> &str {
        self.raw_text.trim()
    }

    /// Live markers are attached and rendered.
    pub fn is_live(&self) -> bool {
        self.attached && self.visible
    }
}

/// Structured fields scraped from the assignment page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    pub genre: Option<String>,
    pub theme: Option<String>,
    pub proposal: Option<String>,
    pub support_texts: Option<String>,
}

impl PageContext {
    pub fn is_empty(&self) -> bool {
        [&self.genre, &self.theme, &self.proposal, &self.support_texts]
            .iter()
            .all(|field| field.as_deref().is_none_or(|s| s.trim().is_empty()))
    }
}
