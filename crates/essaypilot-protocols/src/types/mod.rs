//! Common types used across essaypilot.

mod common;
mod correction;

pub use common::*;
pub use correction::*;
