//! Host page trait definition.

use async_trait::async_trait;

use super::{MarkerSnapshot, PageContext, Presence};
use crate::error::PageError;

/// DOM primitives of the page hosting the essay form.
///
/// Every element-addressing method targets the first element matching the
/// selector and fails with [`PageError::Detached`] when nothing matches,
/// unless documented otherwise.
#[async_trait]
pub trait HostPage: Send + Sync {
    /// Presence of the first element matching `selector`. Never fails on a
    /// missing element.
    async fn probe(&self, selector: &str) -> Result<Presence, PageError>;

    /// Number of elements matching `selector`.
    async fn count(&self, selector: &str) -> Result<usize, PageError>;

    /// Current value of an input or textarea.
    async fn read_value(&self, selector: &str) -> Result<String, PageError>;

    /// Write `value` through the element's native value setter, fire
    /// `input` and `change`, then place the cursor at `cursor` (or leave the
    /// browser default when `None`). Cursor offsets count UTF-16 code units,
    /// as the DOM does. A cursor at the end also scrolls to the bottom.
    async fn write_value(
        &self,
        selector: &str,
        value: &str,
        cursor: Option<usize>,
    ) -> Result<(), PageError>;

    /// Plain property assignment, no events. Last-resort clearing.
    async fn force_value(&self, selector: &str, value: &str) -> Result<(), PageError>;

    /// Focus without scrolling.
    async fn focus(&self, selector: &str) -> Result<(), PageError>;

    /// Emit one character: keydown, keypress, native-setter splice at the
    /// selection, `input`/`change`, keyup. Returns whether the value changed.
    async fn send_char(&self, selector: &str, ch: char) -> Result<bool, PageError>;

    /// Select the whole value.
    async fn select_all(&self, selector: &str) -> Result<(), PageError>;

    /// Simulated backspace over the selection (or the character before the
    /// cursor). Returns whether the value changed.
    async fn send_backspace(&self, selector: &str) -> Result<bool, PageError>;

    /// Visible labels of every `<button>` in document order, trimmed.
    async fn button_labels(&self) -> Result<Vec<String>, PageError>;

    /// Click the first button whose trimmed label equals `label`.
    /// Returns false when no button matched.
    async fn click_button(&self, label: &str) -> Result<bool, PageError>;

    /// Snapshot of the first element matching the marker selector.
    async fn first_marker(&self, selector: &str) -> Result<Option<MarkerSnapshot>, PageError>;

    /// Scroll the first match into the center of the viewport.
    async fn scroll_into_view(&self, selector: &str) -> Result<(), PageError>;

    /// Click the first match.
    async fn click(&self, selector: &str) -> Result<(), PageError>;

    /// Strip the highlight from the first match so the marker selector no
    /// longer matches it.
    async fn retire_marker(&self, selector: &str) -> Result<(), PageError>;

    /// Trimmed text of every `li` entry of the menu, in order, first entry
    /// included.
    async fn menu_entries(&self, selector: &str) -> Result<Vec<String>, PageError>;

    /// Click on the document body to close open menus.
    async fn dismiss(&self) -> Result<(), PageError>;

    /// Take the page-wide busy marker for `owner`. False when any owner,
    /// `owner` included, already holds it. The check and the set happen in
    /// one page script turn, so concurrent clients of the same tab cannot
    /// both succeed.
    async fn claim_busy(&self, owner: &str) -> Result<bool, PageError>;

    /// Clear the busy marker when `owner` holds it. Returns whether it did.
    async fn release_busy(&self, owner: &str) -> Result<bool, PageError>;

    /// Current holder of the busy marker.
    async fn busy_owner(&self) -> Result<Option<String>, PageError>;

    /// Scrape the assignment fields below `root_selector` (document body if
    /// absent).
    async fn extract_context(&self, root_selector: &str) -> Result<PageContext, PageError>;
}
