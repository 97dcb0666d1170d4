//! Decision surface trait definition.

use async_trait::async_trait;

use super::{Dialog, GenerationChoice, UserAction};
use crate::error::DecisionError;
use crate::types::ErrorContext;

/// User-facing surfaces: modal dialogs, the per-error decision panel, the
/// loading overlay and the AI result popup.
///
/// Implementations render the surfaces; single-flight and resolution rules
/// live with the caller.
#[async_trait]
pub trait DecisionSurface: Send + Sync {
    /// Show a modal dialog and wait for a button. Returns the button value.
    async fn ask(&self, dialog: &Dialog) -> Result<String, DecisionError>;

    /// Open the persistent decision panel with a heading.
    async fn open_panel(&self, heading: &str) -> Result<(), DecisionError>;

    /// Replace the panel heading without changing its state.
    async fn set_heading(&self, heading: &str) -> Result<(), DecisionError>;

    /// Render the error in context plus suggestion, manual and skip
    /// buttons, and wait for one of them.
    async fn await_action(
        &self,
        context: &ErrorContext,
        suggestions: &[String],
    ) -> Result<UserAction, DecisionError>;

    /// Text prompt seeded with `seed`. `None` when the user cancels.
    async fn prompt_text(&self, message: &str, seed: &str) -> Result<Option<String>, DecisionError>;

    /// Switch the panel to its non-interactive "applying" state.
    async fn show_applying(&self, message: &str) -> Result<(), DecisionError>;

    /// Remove the decision panel.
    async fn close_panel(&self) -> Result<(), DecisionError>;

    /// Show the loading overlay with a status line and an empty progress bar.
    async fn open_loading(&self, status: &str) -> Result<(), DecisionError>;

    /// Update the loading overlay. `None` leaves the field unchanged.
    async fn update_loading(
        &self,
        status: Option<&str>,
        progress: Option<u8>,
    ) -> Result<(), DecisionError>;

    /// Remove the loading overlay.
    async fn close_loading(&self) -> Result<(), DecisionError>;

    /// Show AI-generated text with write/regenerate/abandon actions.
    async fn show_generated(&self, text: &str) -> Result<GenerationChoice, DecisionError>;

    /// Show one countdown digit over the overlay for `millis`.
    async fn countdown_tick(&self, digit: u8, millis: u64) -> Result<(), DecisionError>;

    /// Remove every overlay this surface owns.
    async fn close_all(&self) -> Result<(), DecisionError>;
}
