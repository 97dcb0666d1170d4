//! Correction orchestration engine.
//!
//! One run walks `SelectingMode → PreChecking → ProcessingMarkers →
//! ReviewOffer → Done`, or ends in `Failed` on a precondition failure.
//! Markers are always processed one at a time, re-querying the first live
//! marker after every mutation of the buffer.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use essaypilot_config::{Config, SelectorConfig, TimingConfig};
use essaypilot_protocols::{
    CorrectionMode, DecisionSurface, HostPage, MarkerSnapshot, Resolution, Severity,
};

use crate::busy::BusyFlag;
use crate::context::{error_context, CONTEXT_WORDS};
use crate::decision::DecisionUi;
use crate::error::{CorrectionError, WaitError};
use crate::report::{CorrectionOutcome, CorrectionReport, CorrectionTally, MarkerOutcome};
use crate::review::AiReview;
use crate::wait::{Disappearance, DomWaiter};

/// Extra iterations allowed over the initial marker count.
pub const ITERATION_SLACK: usize = 20;

/// Longest suggestion kept from a marker menu, in characters.
const MAX_SUGGESTION_CHARS: usize = 50;

const BLANK_MARKER_CLICK_MS: u64 = 50;

/// Run phases, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    SelectingMode,
    PreChecking,
    ProcessingMarkers,
    ReviewOffer,
    Done,
    Failed,
}

/// Mutable state of one run. Created when the run starts and dropped when
/// it ends.
#[derive(Debug)]
pub struct Session {
    pub mode: Option<CorrectionMode>,
    pub phase: Phase,
    pub tally: CorrectionTally,
    pub markers_at_start: usize,
    pub iterations: usize,
    panel_open: bool,
}

impl Session {
    fn new() -> Self {
        Self {
            mode: None,
            phase: Phase::SelectingMode,
            tally: CorrectionTally::default(),
            markers_at_start: 0,
            iterations: 0,
            panel_open: false,
        }
    }

    fn enter(&mut self, phase: Phase) {
        debug!("Correction phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    pub fn max_iterations(&self) -> usize {
        self.markers_at_start + ITERATION_SLACK
    }
}

/// State of the page's own corrector, read from its button row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectorButton {
    /// The conclude button is shown; the essay was already corrected.
    Concluded,
    /// The corrector button shows a waiting label.
    CoolingDown(String),
    /// The corrector button is ready to be clicked.
    Ready,
    /// Neither button is present.
    Absent,
}

/// Scan button labels in document order. The first conclude or waiting
/// label ends the scan.
pub fn scan_buttons(labels: &[String], conclude: &str, corrector: &str) -> CorrectorButton {
    let mut ready = false;
    for label in labels {
        let label = label.trim();
        if label == conclude {
            return CorrectorButton::Concluded;
        }
        if label.contains(corrector) {
            if label == corrector {
                ready = true;
            } else {
                return CorrectorButton::CoolingDown(label.to_string());
            }
        }
    }
    if ready {
        CorrectorButton::Ready
    } else {
        CorrectorButton::Absent
    }
}

/// Candidate replacements from a marker menu: the first entry echoes the
/// error and is dropped, the rest are trimmed and kept when non-empty and
/// short.
pub fn suggestion_set(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .skip(1)
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty() && entry.chars().count() < MAX_SUGGESTION_CHARS)
        .collect()
}

/// Drives the page's spell-check markers to resolution.
pub struct Corrector {
    page: Arc<dyn HostPage>,
    ui: DecisionUi,
    waiter: DomWaiter,
    reviewer: Option<AiReview>,
    selectors: SelectorConfig,
    timing: TimingConfig,
    busy: BusyFlag,
    preset_mode: Option<CorrectionMode>,
    assume_yes: bool,
}

fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

impl Corrector {
    pub fn new(
        page: Arc<dyn HostPage>,
        surface: Arc<dyn DecisionSurface>,
        config: &Config,
    ) -> Self {
        Self {
            waiter: DomWaiter::new(page.clone(), &config.timing),
            busy: BusyFlag::new(page.clone()),
            page,
            ui: DecisionUi::new(surface),
            reviewer: None,
            selectors: config.selectors.clone(),
            timing: config.timing.clone(),
            preset_mode: None,
            assume_yes: false,
        }
    }

    /// Offer the AI review pass at the end of a run.
    pub fn with_reviewer(mut self, reviewer: AiReview) -> Self {
        self.reviewer = Some(reviewer);
        self
    }

    /// Share a busy marker handle, typically with a [`Typist`](crate::Typist)
    /// on the same page.
    pub fn with_busy_flag(mut self, busy: BusyFlag) -> Self {
        self.busy = busy;
        self
    }

    /// Skip the mode dialog.
    pub fn with_mode(mut self, mode: Option<CorrectionMode>) -> Self {
        self.preset_mode = mode;
        self
    }

    /// Skip the basic-mode confirmation.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    /// Run one correction pass. The busy marker and the decision panel are
    /// released on every exit path.
    pub async fn run(&self) -> Result<CorrectionReport, CorrectionError> {
        let busy = match self.busy.try_acquire().await {
            Ok(Some(guard)) => guard,
            Ok(None) => {
                warn!("Correction already running on this page");
                self.notify(&CorrectionError::Busy.to_string(), Severity::Warning)
                    .await;
                return Err(CorrectionError::Busy);
            }
            Err(e) => {
                error!("Failed to claim the busy marker: {}", e);
                let e = CorrectionError::from(e);
                self.notify(&format!("Ocorreu um erro na correção: {e}"), Severity::Error)
                    .await;
                return Err(e);
            }
        };

        let mut session = Session::new();
        let result = self.drive(&mut session).await;
        self.close_panel(&mut session).await;
        busy.release().await;

        match &result {
            Ok(report) => {
                session.enter(Phase::Done);
                info!(
                    "Correction finished ({}): {} [{}]",
                    report.outcome, report.tally, report.message
                );
                if report.outcome != CorrectionOutcome::Cancelled {
                    self.notify(&report.message, report.severity).await;
                }
            }
            Err(e) => {
                session.enter(Phase::Failed);
                error!("Correction failed: {}", e);
                let message = if e.is_precondition() {
                    e.to_string()
                } else {
                    format!("Ocorreu um erro na correção: {e}")
                };
                self.notify(&message, Severity::Error).await;
            }
        }
        result
    }

    async fn drive(&self, session: &mut Session) -> Result<CorrectionReport, CorrectionError> {
        session.enter(Phase::SelectingMode);
        let Some(mode) = self.select_mode().await? else {
            info!("Correction cancelled by the user");
            return Ok(CorrectionReport::cancelled());
        };
        session.mode = Some(mode);
        info!("Correction mode: {}", mode);

        if mode == CorrectionMode::Advanced {
            self.ui
                .surface()
                .open_panel("Preparando correção avançada...")
                .await?;
            session.panel_open = true;
        }

        session.enter(Phase::PreChecking);
        let report = if self.precheck(session).await? {
            info!("Conclude button present, skipping markers");
            CorrectionReport::already_concluded(mode)
        } else {
            session.enter(Phase::ProcessingMarkers);
            self.process_markers(session, mode).await?
        };
        self.close_panel(session).await;

        session.enter(Phase::ReviewOffer);
        self.offer_review(report).await
    }

    async fn select_mode(&self) -> Result<Option<CorrectionMode>, CorrectionError> {
        let mode = match self.preset_mode {
            Some(mode) => mode,
            None => match self.ui.choose_mode().await? {
                Some(mode) => mode,
                None => return Ok(None),
            },
        };
        if mode == CorrectionMode::Basic && !self.assume_yes && !self.ui.confirm_basic().await? {
            return Ok(None);
        }
        Ok(Some(mode))
    }

    /// Locate the text buffer and settle the page's own corrector. Returns
    /// true when the essay is already concluded.
    async fn precheck(&self, session: &Session) -> Result<bool, CorrectionError> {
        match self
            .waiter
            .wait_for_appear(&self.selectors.text_buffer, millis(self.timing.target_wait_ms))
            .await
        {
            Ok(()) => debug!("Text buffer found"),
            Err(WaitError::Timeout { .. }) => return Err(CorrectionError::TargetNotFound),
            Err(WaitError::Page(e)) => return Err(e.into()),
        }

        let labels = self.page.button_labels().await?;
        match scan_buttons(
            &labels,
            &self.selectors.conclude_label,
            &self.selectors.corrector_label,
        ) {
            CorrectorButton::Concluded => Ok(true),
            CorrectorButton::CoolingDown(label) => {
                Err(CorrectionError::CorrectorCoolingDown(label))
            }
            CorrectorButton::Ready => {
                if session.panel_open {
                    self.ui
                        .surface()
                        .show_applying("Iniciando correção online...")
                        .await?;
                }
                info!("Starting the page's online corrector");
                self.page
                    .click_button(&self.selectors.corrector_label)
                    .await?;
                let processed = self
                    .waiter
                    .wait_for_disappear(
                        &self.selectors.processing_indicator,
                        millis(self.timing.processing_wait_ms),
                    )
                    .await;
                if processed == Disappearance::TimedOut {
                    warn!("Processing indicator still visible, continuing anyway");
                }
                sleep(millis(self.timing.corrector_settle_ms)).await;
                Ok(false)
            }
            CorrectorButton::Absent => {
                debug!("No corrector or conclude button found");
                Ok(false)
            }
        }
    }

    async fn process_markers(
        &self,
        session: &mut Session,
        mode: CorrectionMode,
    ) -> Result<CorrectionReport, CorrectionError> {
        let selector = &self.selectors.marker;
        if session.panel_open {
            self.ui.surface().set_heading("Procurando erros...").await?;
        }

        session.markers_at_start = self.page.count(selector).await?;
        if session.markers_at_start == 0 {
            info!("No markers found");
            return Ok(CorrectionReport::nothing_to_do(mode));
        }
        info!("Found {} markers", session.markers_at_start);

        let mut exhausted = false;
        while session.iterations < session.max_iterations() {
            session.iterations += 1;

            let Some(marker) = self.page.first_marker(selector).await? else {
                exhausted = true;
                break;
            };
            if !marker.is_live() {
                debug!("Marker {} hidden or detached, retrying", session.iterations);
                sleep(millis(self.timing.step_ms)).await;
                continue;
            }
            if marker.trimmed().is_empty() {
                debug!("Blank marker, dismissing");
                self.dismiss_blank(&marker).await;
                continue;
            }

            debug!("Processing marker {}: {:?}", session.iterations, marker.trimmed());
            let outcome = match self.resolve_marker(mode, &marker).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Marker {:?} failed: {}", marker.trimmed(), e);
                    MarkerOutcome::Errored
                }
            };
            session.tally.record(outcome);

            self.retire(&marker).await;
            if let Err(e) = self.page.dismiss().await {
                debug!("Dismiss failed: {}", e);
            }
            sleep(millis(self.timing.step_ms)).await;
        }

        let hit_limit = !exhausted && self.page.count(selector).await? > 0;
        if hit_limit {
            warn!(
                "Iteration limit of {} reached with markers left",
                session.max_iterations()
            );
        }
        Ok(CorrectionReport::from_tally(
            session.tally,
            session.markers_at_start,
            hit_limit,
            mode,
        ))
    }

    async fn resolve_marker(
        &self,
        mode: CorrectionMode,
        marker: &MarkerSnapshot,
    ) -> Result<MarkerOutcome, CorrectionError> {
        let selector = &self.selectors.marker;
        self.page.scroll_into_view(selector).await?;
        sleep(millis(self.timing.scroll_ms)).await;
        self.page.click(selector).await?;
        sleep(millis(self.timing.marker_click_ms)).await;

        let menu = &self.selectors.suggestion_menu;
        let suggestions = match self
            .waiter
            .wait_for_appear(menu, millis(self.timing.menu_wait_ms))
            .await
        {
            Ok(()) => {
                sleep(millis(self.timing.menu_render_ms)).await;
                let suggestions = suggestion_set(self.page.menu_entries(menu).await?);
                debug!("Suggestions for {:?}: {:?}", marker.trimmed(), suggestions);
                Some(suggestions)
            }
            Err(WaitError::Timeout { .. }) => {
                debug!("No suggestion menu for {:?}", marker.trimmed());
                None
            }
            Err(WaitError::Page(e)) => return Err(e.into()),
        };

        let resolution = self.decide(mode, marker, suggestions).await?;
        debug!("Resolution for {:?}: {}", marker.trimmed(), resolution.kind());
        self.apply(marker, resolution).await
    }

    async fn decide(
        &self,
        mode: CorrectionMode,
        marker: &MarkerSnapshot,
        suggestions: Option<Vec<String>>,
    ) -> Result<Resolution, CorrectionError> {
        use CorrectionMode::{Advanced, Basic};

        let resolution = match (mode, suggestions) {
            (Basic, None) => {
                self.dismiss_menu().await;
                Resolution::Skip
            }
            (Basic, Some(suggestions)) => match suggestions.into_iter().next() {
                Some(first) => Resolution::Auto(first),
                None => Resolution::Skip,
            },
            (Advanced, None) => {
                self.dismiss_menu().await;
                let context = self.error_context(marker).await?;
                self.ui.present(&context, &[]).await?
            }
            (Advanced, Some(suggestions)) if suggestions.is_empty() => {
                debug!("Menu for {:?} had no valid suggestions", marker.trimmed());
                self.dismiss_menu().await;
                let context = self.error_context(marker).await?;
                self.ui.present(&context, &[]).await?
            }
            (Advanced, Some(mut suggestions)) if suggestions.len() == 1 => {
                let only = suggestions.remove(0);
                self.ui.show_auto(&marker.raw_text, &only).await?;
                sleep(millis(self.timing.auto_apply_feedback_ms)).await;
                Resolution::Auto(only)
            }
            (Advanced, Some(suggestions)) => {
                let context = self.error_context(marker).await?;
                self.ui.present(&context, &suggestions).await?
            }
        };
        Ok(resolution)
    }

    async fn error_context(
        &self,
        marker: &MarkerSnapshot,
    ) -> Result<essaypilot_protocols::ErrorContext, CorrectionError> {
        let text = self.page.read_value(&self.selectors.text_buffer).await?;
        Ok(error_context(&text, &marker.raw_text, CONTEXT_WORDS, CONTEXT_WORDS))
    }

    async fn apply(
        &self,
        marker: &MarkerSnapshot,
        resolution: Resolution,
    ) -> Result<MarkerOutcome, CorrectionError> {
        let replacement = match resolution {
            Resolution::Suggestion(text) | Resolution::Manual(text) | Resolution::Auto(text) => {
                text
            }
            Resolution::Skip => return Ok(MarkerOutcome::Skipped),
            Resolution::Error => return Ok(MarkerOutcome::Errored),
        };

        let selector = &self.selectors.text_buffer;
        let current = self.page.read_value(selector).await?;
        let raw = marker.raw_text.as_str();
        let Some(index) = current.find(raw) else {
            warn!("{:?} no longer in the buffer, counting as skipped", marker.trimmed());
            return Ok(MarkerOutcome::Skipped);
        };

        let (value, cursor) = splice(&current, index, raw, &replacement);
        self.page.focus(selector).await?;
        self.page.write_value(selector, &value, Some(cursor)).await?;
        info!("Corrected {:?} -> {:?}", marker.trimmed(), replacement);
        sleep(millis(self.timing.post_apply_ms)).await;
        Ok(MarkerOutcome::Corrected)
    }

    /// Strip the highlight from the processed marker unless the page already
    /// moved on to another one.
    async fn retire(&self, marker: &MarkerSnapshot) {
        let selector = &self.selectors.marker;
        match self.page.first_marker(selector).await {
            Ok(Some(current)) if current.raw_text == marker.raw_text => {
                if let Err(e) = self.page.retire_marker(selector).await {
                    debug!("Failed to retire marker: {}", e);
                }
            }
            Ok(_) => debug!("Marker already gone"),
            Err(e) => debug!("Failed to re-query marker: {}", e),
        }
    }

    async fn dismiss_blank(&self, marker: &MarkerSnapshot) {
        if let Err(e) = self.page.click(&self.selectors.marker).await {
            debug!("Click on blank marker failed: {}", e);
        }
        sleep(millis(BLANK_MARKER_CLICK_MS)).await;
        self.dismiss_menu().await;
        self.retire(marker).await;
        sleep(millis(self.timing.step_ms)).await;
    }

    async fn dismiss_menu(&self) {
        if let Err(e) = self.page.dismiss().await {
            debug!("Dismiss failed: {}", e);
        }
    }

    async fn offer_review(
        &self,
        report: CorrectionReport,
    ) -> Result<CorrectionReport, CorrectionError> {
        let Some(reviewer) = &self.reviewer else {
            debug!("No AI service configured, skipping review offer");
            return Ok(report);
        };
        let selector = &self.selectors.text_buffer;
        if !self.page.probe(selector).await?.exists() {
            info!("Text buffer gone, skipping review offer");
            return Ok(report);
        }
        if !self.ui.offer_review().await? {
            info!("AI review declined");
            return Ok(report);
        }

        match reviewer.review(selector).await {
            Ok(()) => Ok(report.with_review_applied()),
            Err(e) => {
                self.notify(&format!("Erro na revisão final da IA: {e}"), Severity::Error)
                    .await;
                Ok(report)
            }
        }
    }

    async fn close_panel(&self, session: &mut Session) {
        if !session.panel_open {
            return;
        }
        session.panel_open = false;
        if let Err(e) = self.ui.surface().close_panel().await {
            warn!("Failed to close decision panel: {}", e);
        }
        sleep(millis(self.timing.overlay_settle_ms)).await;
    }

    async fn notify(&self, message: &str, severity: Severity) {
        if let Err(e) = self.ui.notify(message, severity).await {
            warn!("Failed to show message: {}", e);
        }
    }
}

/// Replace `raw` at byte `index` of `current`, keeping the whitespace the
/// marker carried around its word. Returns the new value and the cursor
/// position after the replacement, in UTF-16 units.
fn splice(current: &str, index: usize, raw: &str, replacement: &str) -> (String, usize) {
    let lead = &raw[..raw.len() - raw.trim_start().len()];
    let trail = &raw[raw.trim_end().len()..];
    let (prefix, rest) = current.split_at(index);
    let suffix = &rest[raw.len()..];

    let inserted = format!("{lead}{replacement}{trail}");
    let cursor = prefix.encode_utf16().count() + inserted.encode_utf16().count();
    (format!("{prefix}{inserted}{suffix}"), cursor)
}

#[cfg(test)]
#[path = "corrector_tests.rs"]
mod tests;
