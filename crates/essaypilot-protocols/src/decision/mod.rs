//! Decision surface protocol.

mod traits;
mod types;

pub use traits::DecisionSurface;
pub use types::*;

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
