//! Busy marker shared by the correction run and the typing feature.
//!
//! The marker is held by the host page itself, so every process attached to
//! the same tab sees one claim. A reload of the page clears it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use essaypilot_protocols::{HostPage, PageError};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

/// Cloneable handle to the busy marker of one page. Clones share the owner
/// id, so a clone cannot claim the marker while the original holds it.
#[derive(Clone)]
pub struct BusyFlag {
    page: Arc<dyn HostPage>,
    owner: String,
}

impl BusyFlag {
    pub fn new(page: Arc<dyn HostPage>) -> Self {
        let owner = format!(
            "{}:{}",
            std::process::id(),
            NEXT_OWNER.fetch_add(1, Ordering::Relaxed)
        );
        Self { page, owner }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Claim the marker. `None` when someone already holds it.
    pub async fn try_acquire(&self) -> Result<Option<BusyGuard>, PageError> {
        if !self.page.claim_busy(&self.owner).await? {
            return Ok(None);
        }
        debug!("Busy marker claimed by {}", self.owner);
        Ok(Some(BusyGuard {
            page: self.page.clone(),
            owner: self.owner.clone(),
            released: false,
        }))
    }

    pub async fn is_busy(&self) -> Result<bool, PageError> {
        Ok(self.page.busy_owner().await?.is_some())
    }
}

impl std::fmt::Debug for BusyFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusyFlag").field("owner", &self.owner).finish()
    }
}

/// Holds the marker until [`release`](Self::release) is awaited. Dropped
/// without release, it schedules the release on the current runtime.
pub struct BusyGuard {
    page: Arc<dyn HostPage>,
    owner: String,
    released: bool,
}

impl BusyGuard {
    pub async fn release(mut self) {
        self.released = true;
        release(self.page.as_ref(), &self.owner).await;
    }
}

async fn release(page: &dyn HostPage, owner: &str) {
    match page.release_busy(owner).await {
        Ok(true) => debug!("Busy marker released by {}", owner),
        Ok(false) => warn!("Busy marker no longer held by {}", owner),
        Err(e) => warn!("Failed to release busy marker: {}", e),
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let page = self.page.clone();
        let owner = std::mem::take(&mut self.owner);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { release(page.as_ref(), &owner).await });
            }
            Err(_) => warn!("Busy marker of {} left on the page", owner),
        }
    }
}
