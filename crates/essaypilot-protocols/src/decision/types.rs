//! Dialog and decision types.

use serde::{Deserialize, Serialize};

use crate::types::DialogTone;

/// One button of a modal dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogButton {
    pub label: String,
    /// Value reported when the button is clicked.
    pub value: String,
    #[serde(default)]
    pub secondary: bool,
}

impl DialogButton {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            secondary: false,
        }
    }

    pub fn secondary(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            secondary: true,
            ..Self::new(label, value)
        }
    }
}

/// A modal dialog with a fixed button vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    /// Overlay id; showing a dialog replaces any overlay with the same id.
    pub id: String,
    pub message: String,
    pub tone: DialogTone,
    pub buttons: Vec<DialogButton>,
}

impl Dialog {
    pub fn new(id: impl Into<String>, message: impl Into<String>, tone: DialogTone) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            tone,
            buttons: Vec::new(),
        }
    }

    pub fn with_button(mut self, button: DialogButton) -> Self {
        self.buttons.push(button);
        self
    }

    /// Single OK button.
    pub fn alert(message: impl Into<String>, tone: DialogTone) -> Self {
        Self::new("alert", message, tone).with_button(DialogButton::new("OK", "ok"))
    }
}

/// Raw user action on the decision panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "lowercase")]
pub enum UserAction {
    /// A suggestion button was clicked.
    Pick(String),
    /// "Write manually" was clicked; the text prompt is still to be shown.
    Manual,
    /// "Skip error" was clicked.
    Skip,
}

/// User choice on the AI result popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationChoice {
    Write,
    Regenerate,
    Abandon,
}
