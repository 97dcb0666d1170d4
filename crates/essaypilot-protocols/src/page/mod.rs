//! Host page protocol.

mod traits;
mod types;

pub use traits::HostPage;
pub use types::*;
