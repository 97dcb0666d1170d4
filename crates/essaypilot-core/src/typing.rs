//! Keystroke simulation and buffer replacement.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use essaypilot_config::TypingConfig;
use essaypilot_protocols::{DecisionSurface, HostPage, PageError};

use crate::busy::BusyFlag;
use crate::error::TypingError;

const PROGRESS_EVERY: usize = 200;
const COUNTDOWN_DIGIT_MS: u64 = 700;
const COUNTDOWN_GAP_MS: u64 = 100;
const VERIFY_TAIL_CHARS: usize = 10;

/// Result of one typing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypingStats {
    /// Characters that changed the buffer.
    pub typed: usize,
    /// Characters the page refused or failed to take.
    pub failed: usize,
    /// Trailing characters were found in the buffer afterwards. Always true
    /// for passes that skip verification.
    pub verified: bool,
}

/// Types into, clears and appends to editable elements of the host page.
#[derive(Clone)]
pub struct Typist {
    page: Arc<dyn HostPage>,
    fast_delay: Duration,
    countdown_from: u8,
    surface: Option<Arc<dyn DecisionSurface>>,
    busy: BusyFlag,
}

impl Typist {
    pub fn new(page: Arc<dyn HostPage>, config: &TypingConfig) -> Self {
        Self {
            busy: BusyFlag::new(page.clone()),
            page,
            fast_delay: Duration::from_millis(config.fast_delay_ms),
            countdown_from: config.countdown_from,
            surface: None,
        }
    }

    /// Surface used for the countdown before interactive typing.
    pub fn with_surface(mut self, surface: Arc<dyn DecisionSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Share a busy marker handle. Interactive typing claims the page's
    /// marker either way and refuses to start while a correction holds it.
    pub fn with_busy_flag(mut self, busy: BusyFlag) -> Self {
        self.busy = busy;
        self
    }

    async fn ensure_attached(&self, selector: &str) -> Result<(), TypingError> {
        if self.page.probe(selector).await?.exists() {
            Ok(())
        } else {
            Err(TypingError::TargetDetached(selector.to_string()))
        }
    }

    /// Bulk typing with the short fixed delay.
    pub async fn type_fast(&self, selector: &str, text: &str) -> Result<TypingStats, TypingError> {
        self.ensure_attached(selector).await?;
        let stats = self.type_chars(selector, text, self.fast_delay).await?;
        info!(
            "Fast typing finished: {} typed, {} failed",
            stats.typed, stats.failed
        );
        Ok(TypingStats {
            verified: true,
            ..stats
        })
    }

    /// Interactive typing: countdown, per-character delay, then a check that
    /// the tail of `text` made it into the buffer.
    pub async fn type_with_delay(
        &self,
        selector: &str,
        text: &str,
        delay: Duration,
    ) -> Result<TypingStats, TypingError> {
        if text.is_empty() {
            return Err(TypingError::EmptyText);
        }
        let Some(busy) = self.busy.try_acquire().await? else {
            warn!("Busy marker held, refusing to type");
            return Err(TypingError::Busy);
        };
        let result = self.type_claimed(selector, text, delay).await;
        busy.release().await;
        result
    }

    async fn type_claimed(
        &self,
        selector: &str,
        text: &str,
        delay: Duration,
    ) -> Result<TypingStats, TypingError> {
        self.ensure_attached(selector).await?;

        self.countdown().await?;

        info!(
            "Typing {} characters with {}ms delay",
            text.chars().count(),
            delay.as_millis()
        );
        let mut stats = self.type_chars(selector, text, delay).await?;

        let value = self.page.read_value(selector).await?;
        let tail_start = text
            .char_indices()
            .rev()
            .nth(VERIFY_TAIL_CHARS - 1)
            .map_or(0, |(i, _)| i);
        stats.verified = value.contains(&text[tail_start..]);
        if !stats.verified {
            warn!("Typing may have been interrupted: tail of the text not found in the buffer");
        }
        Ok(stats)
    }

    async fn countdown(&self) -> Result<(), TypingError> {
        let Some(surface) = &self.surface else {
            return Ok(());
        };
        for digit in (1..=self.countdown_from).rev() {
            surface.countdown_tick(digit, COUNTDOWN_DIGIT_MS).await?;
            sleep(Duration::from_millis(COUNTDOWN_GAP_MS)).await;
        }
        Ok(())
    }

    async fn type_chars(
        &self,
        selector: &str,
        text: &str,
        delay: Duration,
    ) -> Result<TypingStats, TypingError> {
        self.page.focus(selector).await?;

        let total = text.chars().count();
        let mut stats = TypingStats::default();
        for (i, ch) in text.chars().enumerate() {
            match self.page.send_char(selector, ch).await {
                Ok(true) => stats.typed += 1,
                Ok(false) => {
                    stats.failed += 1;
                    warn!("Character not taken by the page: {:?}", ch);
                }
                Err(PageError::Detached(_)) => {
                    return Err(TypingError::TargetDetached(selector.to_string()));
                }
                Err(e) => {
                    stats.failed += 1;
                    warn!("Failed to type {:?}: {}", ch, e);
                }
            }
            if (i + 1) % PROGRESS_EVERY == 0 {
                debug!("Typed {}/{} characters", i + 1, total);
            }
            if !delay.is_zero() {
                sleep(delay).await;
            }
        }
        Ok(stats)
    }

    /// Empty the buffer. Tries a native-setter write, then select-all plus
    /// backspace, then a forced assignment, checking after each. Returns
    /// whether the buffer ended up empty.
    pub async fn clear(&self, selector: &str) -> Result<bool, TypingError> {
        self.ensure_attached(selector).await?;
        self.page.focus(selector).await?;

        match self.page.write_value(selector, "", Some(0)).await {
            Ok(()) => {
                if self.is_empty(selector).await? {
                    debug!("Buffer cleared by native setter");
                    return Ok(true);
                }
                debug!("Native setter left text behind");
            }
            Err(e) => warn!("Native setter clear failed: {}", e),
        }

        let backspace = async {
            self.page.select_all(selector).await?;
            self.page.send_backspace(selector).await
        };
        match backspace.await {
            Ok(_) => {
                if self.is_empty(selector).await? {
                    debug!("Buffer cleared by select-all and backspace");
                    return Ok(true);
                }
                debug!("Backspace left text behind");
            }
            Err(e) => warn!("Backspace clear failed: {}", e),
        }

        if let Err(e) = self.page.force_value(selector, "").await {
            warn!("Forced clear failed: {}", e);
        }
        let cleared = self.is_empty(selector).await?;
        if !cleared {
            warn!("Buffer could not be cleared");
        }
        Ok(cleared)
    }

    async fn is_empty(&self, selector: &str) -> Result<bool, TypingError> {
        Ok(self.page.read_value(selector).await?.is_empty())
    }

    /// Append `text` in one write, separated from existing non-blank content
    /// by a blank line. Cursor ends at the end of the buffer.
    pub async fn append(&self, selector: &str, text: &str) -> Result<(), TypingError> {
        self.ensure_attached(selector).await?;
        let current = self.page.read_value(selector).await?;
        let value = joined(&current, text);

        self.page.focus(selector).await?;
        let end = value.encode_utf16().count();
        self.page.write_value(selector, &value, Some(end)).await?;
        info!("Appended {} characters", text.chars().count());
        Ok(())
    }
}

/// `current` followed by `text`, with a blank line between them when
/// `current` has content.
pub fn joined(current: &str, text: &str) -> String {
    if current.trim().is_empty() {
        format!("{current}{text}")
    } else {
        format!("{current}\n\n{text}")
    }
}

#[cfg(test)]
#[path = "typing_tests.rs"]
mod tests;
