//! Essay generation from the assignment context.

use std::sync::Arc;

use tracing::{info, warn};

use essaypilot_config::{Config, SelectorConfig};
use essaypilot_protocols::{
    GenerationChoice, HostPage, Severity, TextGenerator, WriteMode,
};

use crate::context::extract_context;
use crate::decision::DecisionUi;
use crate::error::WorkflowError;
use crate::typing::Typist;

pub fn generation_prompt(context: &str, min_words: u32, max_words: u32) -> String {
    format!(
        "Crie uma redação, e envie somente ela, sem título, sem textos adicionais, sem NADA a mais. \
         Somente o texto da redação entre {min_words} palavras (no minimo) e {max_words} palavras (no maximo).\n\n{context}"
    )
}

/// How a generation request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The confirmation dialog was declined.
    Declined,
    /// The generated text was discarded.
    Abandoned,
    /// The write-mode dialog was cancelled.
    WriteCancelled,
    Written(WriteMode),
}

/// Drafts an essay with the AI service and writes it into the buffer.
pub struct EssayGenerator {
    generator: Arc<dyn TextGenerator>,
    page: Arc<dyn HostPage>,
    ui: DecisionUi,
    typist: Typist,
    selectors: SelectorConfig,
    min_words: u32,
    max_words: u32,
}

impl EssayGenerator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        page: Arc<dyn HostPage>,
        ui: DecisionUi,
        config: &Config,
    ) -> Self {
        Self {
            typist: Typist::new(page.clone(), &config.typing),
            generator,
            page,
            ui,
            selectors: config.selectors.clone(),
            min_words: config.ai.min_words,
            max_words: config.ai.max_words,
        }
    }

    /// Confirm, generate, let the user regenerate as often as they like,
    /// then write. Failures are shown to the user before being returned.
    pub async fn run(&self) -> Result<GenerationOutcome, WorkflowError> {
        let result = self.generate_and_write().await;
        match &result {
            Ok(outcome) => info!("Generation finished: {:?}", outcome),
            Err(e) => {
                warn!("Generation failed: {}", e);
                let message = format!("Erro ao gerar texto: {e}");
                if let Err(notify_err) = self.ui.notify(&message, Severity::Error).await {
                    warn!("Failed to show generation error: {}", notify_err);
                }
            }
        }
        result
    }

    async fn generate_and_write(&self) -> Result<GenerationOutcome, WorkflowError> {
        if !self.ui.confirm_generation().await? {
            info!("Generation declined");
            return Ok(GenerationOutcome::Declined);
        }

        let surface = self.ui.surface().clone();
        surface.open_loading("Extraindo contexto da página...").await?;
        let first = async {
            surface.update_loading(None, Some(10)).await?;
            let context = extract_context(self.page.as_ref(), &self.selectors.context_root)
                .await?
                .ok_or(WorkflowError::ContextMissing)?;
            surface
                .update_loading(Some("Construindo prompt para IA..."), Some(25))
                .await?;
            let prompt = generation_prompt(&context, self.min_words, self.max_words);
            surface
                .update_loading(Some("Comunicando com a IA..."), Some(40))
                .await?;
            let text = self.generator.generate(&prompt).await?;
            surface.update_loading(None, Some(100)).await?;
            Ok::<_, WorkflowError>((prompt, text))
        }
        .await;
        self.close_loading().await;
        let (prompt, mut text) = first?;

        loop {
            match surface.show_generated(&text).await? {
                GenerationChoice::Write => return self.write(&text).await,
                GenerationChoice::Abandon => return Ok(GenerationOutcome::Abandoned),
                GenerationChoice::Regenerate => {
                    info!("Regenerating with the same prompt");
                    surface.open_loading("Regenerando texto com a IA...").await?;
                    let regenerated = async {
                        surface.update_loading(None, Some(30)).await?;
                        let text = self.generator.generate(&prompt).await?;
                        surface.update_loading(None, Some(100)).await?;
                        Ok::<_, WorkflowError>(text)
                    }
                    .await;
                    self.close_loading().await;
                    text = regenerated?;
                }
            }
        }
    }

    async fn close_loading(&self) {
        if let Err(e) = self.ui.surface().close_loading().await {
            warn!("Failed to close loading overlay: {}", e);
        }
    }

    async fn write(&self, text: &str) -> Result<GenerationOutcome, WorkflowError> {
        let selector = &self.selectors.text_buffer;
        if !self.page.probe(selector).await?.exists() {
            return Err(WorkflowError::TargetNotFound);
        }

        let mode = self.ui.choose_write_mode().await?;
        let message = match mode {
            WriteMode::Replace => {
                if !self.typist.clear(selector).await? {
                    return Err(WorkflowError::ClearFailed);
                }
                self.typist.type_fast(selector, text).await?;
                "Texto gerado pela IA foi escrito (substituindo o anterior)!"
            }
            WriteMode::Append => {
                self.typist.append(selector, text).await?;
                "Texto gerado pela IA foi adicionado ao final!"
            }
            WriteMode::Cancel => return Ok(GenerationOutcome::WriteCancelled),
        };
        self.ui.notify(message, Severity::Success).await?;
        Ok(GenerationOutcome::Written(mode))
    }
}

#[cfg(test)]
#[path = "generation_tests.rs"]
mod tests;
