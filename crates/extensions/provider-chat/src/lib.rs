//! Chat-completions text generator for essaypilot.

mod api;
mod provider;
mod shape;

pub use provider::ChatProvider;
pub use shape::extract_text;
