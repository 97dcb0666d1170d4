//! Bounded polling for host page elements.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use essaypilot_config::TimingConfig;
use essaypilot_protocols::{HostPage, Presence};

use crate::error::WaitError;

/// Outcome of [`DomWaiter::wait_for_disappear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disappearance {
    Removed,
    TimedOut,
}

/// Poll `probe` until it yields a value or `timeout` elapses.
///
/// The first probe runs immediately. The last probe runs at or after the
/// deadline, so `Ok(None)` is never returned early. Probe errors end the
/// wait.
pub async fn wait_until<F, Fut, T, E>(
    mut probe: F,
    interval: Duration,
    timeout: Duration,
) -> Result<Option<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let start = Instant::now();
    loop {
        if let Some(value) = probe().await? {
            return Ok(Some(value));
        }
        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Ok(None);
        }
        sleep(interval.min(timeout - elapsed)).await;
    }
}

/// Appearance and disappearance waits against a [`HostPage`].
#[derive(Clone)]
pub struct DomWaiter {
    page: Arc<dyn HostPage>,
    appear_poll: Duration,
    disappear_poll: Duration,
}

impl DomWaiter {
    pub fn new(page: Arc<dyn HostPage>, timing: &TimingConfig) -> Self {
        Self {
            page,
            appear_poll: Duration::from_millis(timing.appear_poll_ms),
            disappear_poll: Duration::from_millis(timing.disappear_poll_ms),
        }
    }

    /// Resolve once the first match exists and is rendered.
    pub async fn wait_for_appear(&self, selector: &str, timeout: Duration) -> Result<(), WaitError> {
        let page = &self.page;
        let found = wait_until(
            || async move {
                match page.probe(selector).await? {
                    Presence::Rendered => Ok::<_, WaitError>(Some(())),
                    Presence::Absent | Presence::Hidden => Ok(None),
                }
            },
            self.appear_poll,
            timeout,
        )
        .await?;

        match found {
            Some(()) => {
                debug!("Element appeared: {}", selector);
                Ok(())
            }
            None => Err(WaitError::Timeout {
                selector: selector.to_string(),
                waited_ms: timeout.as_millis() as u64,
            }),
        }
    }

    /// Resolve once nothing matches. Never fails: probe errors count as
    /// "still there" and the wait degrades to [`Disappearance::TimedOut`].
    pub async fn wait_for_disappear(&self, selector: &str, timeout: Duration) -> Disappearance {
        let page = &self.page;
        let removed = wait_until(
            || async move {
                match page.probe(selector).await {
                    Ok(Presence::Absent) => Ok::<_, WaitError>(Some(())),
                    Ok(_) => Ok(None),
                    Err(e) => {
                        debug!("Probe for {} failed while waiting: {}", selector, e);
                        Ok(None)
                    }
                }
            },
            self.disappear_poll,
            timeout,
        )
        .await;

        match removed {
            Ok(Some(())) => Disappearance::Removed,
            Ok(None) | Err(_) => {
                warn!("Timeout waiting for {} to disappear", selector);
                Disappearance::TimedOut
            }
        }
    }
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod tests;
