//! AI review pass over the text buffer.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant};
use tracing::{debug, info, warn};

use essaypilot_config::Config;
use essaypilot_protocols::{DecisionSurface, HostPage, TextGenerator};

use crate::error::WorkflowError;
use crate::typing::Typist;

/// Loading overlay status lines. The last one is only shown once the review
/// has been applied.
pub static REVIEW_STATUSES: [&str; 5] = [
    "Revisando seu texto...",
    "Analisando detalhes...",
    "Aplicando ajustes finos...",
    "Quase pronto...",
    "Paraná Tools informa: 'Revisado!'",
];

pub fn review_prompt(text: &str) -> String {
    format!(
        "Revise este texto e corrija os minimos detalhes ortográficos e gramaticais. \
         Não é para mudar NADA do sentido original, apenas erros. \
         Não adicione NADA, nem título, nem introdução, nem conclusão extra. \
         Retorne APENAS o texto corrigido.\n\nTEXTO ORIGINAL:\n{text}"
    )
}

/// Cycles the loading overlay status over `statuses` until dropped.
pub struct StatusRotation {
    handle: JoinHandle<()>,
}

impl StatusRotation {
    pub fn start(
        surface: Arc<dyn DecisionSurface>,
        statuses: &'static [&'static str],
        every: Duration,
    ) -> Self {
        let handle = tokio::spawn(async move {
            if statuses.is_empty() || every.is_zero() {
                return;
            }
            let mut ticker = interval_at(Instant::now() + every, every);
            let mut index = 0;
            loop {
                ticker.tick().await;
                index = (index + 1) % statuses.len();
                if let Err(e) = surface.update_loading(Some(statuses[index]), None).await {
                    debug!("Status rotation stopped: {}", e);
                    break;
                }
            }
        });
        Self { handle }
    }
}

impl Drop for StatusRotation {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Sends the buffer to the AI service and replaces it with the revision.
pub struct AiReview {
    generator: Arc<dyn TextGenerator>,
    page: Arc<dyn HostPage>,
    surface: Arc<dyn DecisionSurface>,
    typist: Typist,
    rotation_every: Duration,
    final_hold: Duration,
}

impl AiReview {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        page: Arc<dyn HostPage>,
        surface: Arc<dyn DecisionSurface>,
        config: &Config,
    ) -> Self {
        Self {
            typist: Typist::new(page.clone(), &config.typing),
            generator,
            page,
            surface,
            rotation_every: Duration::from_millis(config.timing.status_rotation_ms),
            final_hold: Duration::from_millis(config.timing.final_status_ms),
        }
    }

    /// Run the review with the loading overlay up. The overlay is closed on
    /// every path.
    pub async fn review(&self, selector: &str) -> Result<(), WorkflowError> {
        info!("AI review requested via {}", self.generator.id());
        self.surface.open_loading(REVIEW_STATUSES[0]).await?;
        let result = self.apply_review(selector).await;
        if let Err(e) = self.surface.close_loading().await {
            warn!("Failed to close loading overlay: {}", e);
        }
        match &result {
            Ok(()) => info!("AI review applied"),
            Err(e) => warn!("AI review failed: {}", e),
        }
        result
    }

    async fn apply_review(&self, selector: &str) -> Result<(), WorkflowError> {
        self.surface.update_loading(None, Some(5)).await?;
        let rotation = StatusRotation::start(
            self.surface.clone(),
            &REVIEW_STATUSES[..REVIEW_STATUSES.len() - 1],
            self.rotation_every,
        );

        let current = self.page.read_value(selector).await?;
        if current.trim().is_empty() {
            return Err(WorkflowError::EmptyBuffer);
        }
        self.surface.update_loading(None, Some(20)).await?;

        let revised = self.generator.generate(&review_prompt(&current)).await?;
        drop(rotation);
        self.surface
            .update_loading(Some("Aplicando revisão..."), Some(70))
            .await?;

        if !self.typist.clear(selector).await? {
            return Err(WorkflowError::ClearFailed);
        }
        self.surface.update_loading(None, Some(90)).await?;

        self.typist.type_fast(selector, &revised).await?;
        self.surface
            .update_loading(Some(REVIEW_STATUSES[REVIEW_STATUSES.len() - 1]), Some(100))
            .await?;
        sleep(self.final_hold).await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "review_tests.rs"]
mod tests;
