//! Chrome DevTools Protocol client.
//!
//! Connects to Chrome over WebSocket and talks CDP JSON-RPC with flattened
//! target sessions:
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222", Duration::from_secs(30)).await?;
//! let session = client.attach_page(&page.id).await?;
//! let title = session.evaluate("document.title").await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::{fetch_version, list_pages, CdpClient};
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
