//! Tab selection and attachment.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cdp::{PageInfo, PageSession};
use super::{BrowserError, BrowserManager};

/// First user tab whose URL or title contains `pattern`, or the first user
/// tab when no pattern is given.
pub fn select_page<'a>(pages: &'a [PageInfo], pattern: Option<&str>) -> Option<&'a PageInfo> {
    let mut candidates = pages.iter().filter(|p| p.is_user_page());
    match pattern {
        Some(pattern) => candidates.find(|p| p.url.contains(pattern) || p.title.contains(pattern)),
        None => candidates.next(),
    }
}

impl BrowserManager {
    /// Attach to the tab hosting the essay form and bring it to the front.
    pub async fn attach(&self, pattern: Option<&str>) -> Result<Arc<PageSession>, BrowserError> {
        self.ensure_connected().await?;
        let client = self.client().await?;

        let pages = client.list_pages().await?;
        debug!("{} targets open", pages.len());

        let page = select_page(&pages, pattern).ok_or_else(|| {
            BrowserError::PageNotFound(pattern.unwrap_or("any page").to_string())
        })?;

        let session = client.attach_page(&page.id).await?;
        session.bring_to_front().await?;

        info!("Attached to {} ({})", page.url, page.title);
        Ok(Arc::new(session))
    }
}
