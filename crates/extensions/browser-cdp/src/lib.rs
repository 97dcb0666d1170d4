//! # essaypilot Browser
//!
//! Chrome DevTools Protocol backend for essaypilot.
//!
//! [`BrowserManager`] attaches to (or launches) Chrome and opens a session on
//! the essay tab. Over that session:
//!
//! - [`CdpHostPage`] implements the DOM primitives the engine drives
//! - [`PageOverlay`] draws dialogs, the decision panel and the loading
//!   overlay into the same page

pub mod cdp;
pub mod manager;

mod overlay;
mod page;
mod scripts;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use manager::{select_page, BrowserError, BrowserManager};
pub use overlay::PageOverlay;
pub use page::CdpHostPage;
