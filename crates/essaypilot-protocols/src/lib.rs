//! # essaypilot Protocols
//!
//! Protocol definitions (traits) for the essaypilot correction engine.
//! Contains only interface definitions and shared data types - no
//! implementations.
//!
//! ## Core Traits
//!
//! - [`HostPage`] - DOM primitives of the page hosting the essay form
//! - [`DecisionSurface`] - User-facing dialogs, decision panel and overlays
//! - [`TextGenerator`] - External AI text service

pub mod ai;
pub mod decision;
pub mod error;
pub mod page;
pub mod types;

pub use ai::TextGenerator;
pub use decision::{DecisionSurface, Dialog, DialogButton, GenerationChoice, UserAction};
pub use error::{AiError, DecisionError, PageError};
pub use page::{HostPage, MarkerSnapshot, PageContext, Presence};
pub use types::*;
