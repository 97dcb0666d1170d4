//! Error types for the essaypilot protocol layer.

mod ai;
mod decision;
mod page;

pub use ai::*;
pub use decision::*;
pub use page::*;
