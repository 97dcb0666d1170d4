//! Single-flight decision UI and the fixed dialogs of the workflows.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use essaypilot_protocols::{
    CorrectionMode, DecisionError, DecisionSurface, Dialog, DialogButton, DialogTone,
    ErrorContext, Resolution, Severity, UserAction, WriteMode,
};

pub const MODE_DIALOG: &str = "mode-selection";
pub const BASIC_CONFIRM_DIALOG: &str = "basic-confirm";
pub const REVIEW_DIALOG: &str = "ai-review";
pub const GENERATION_CONFIRM_DIALOG: &str = "ai-generation-confirm";
pub const WRITE_MODE_DIALOG: &str = "ai-write-mode";
pub const ALERT_DIALOG: &str = "alert";

const CHOOSE_HEADING: &str = "Escolha a Correção:";

/// Elicits one [`Resolution`] at a time from a [`DecisionSurface`].
#[derive(Clone)]
pub struct DecisionUi {
    surface: Arc<dyn DecisionSurface>,
    pending: Arc<AtomicBool>,
}

/// Marks the single decision slot taken until dropped.
struct PendingSlot<'a>(&'a AtomicBool);

impl<'a> PendingSlot<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, DecisionError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| DecisionError::AlreadyPending)
    }
}

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl DecisionUi {
    pub fn new(surface: Arc<dyn DecisionSurface>) -> Self {
        Self {
            surface,
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn surface(&self) -> &Arc<dyn DecisionSurface> {
        &self.surface
    }

    /// Show the error with its suggestions and wait for the user.
    ///
    /// Picking a suggestion resolves to [`Resolution::Suggestion`]; the
    /// manual path prompts for text seeded with the error and resolves to
    /// [`Resolution::Manual`], or to [`Resolution::Skip`] when the prompt is
    /// cancelled. The panel is left in its "applying" state.
    pub async fn present(
        &self,
        context: &ErrorContext,
        suggestions: &[String],
    ) -> Result<Resolution, DecisionError> {
        let _slot = PendingSlot::acquire(&self.pending)?;

        self.surface.set_heading(CHOOSE_HEADING).await?;
        let action = self.surface.await_action(context, suggestions).await?;
        debug!("Decision surface action: {:?}", action);

        let (resolution, applying) = match action {
            UserAction::Pick(value) => (Resolution::Suggestion(value), "Aplicando sugestão..."),
            UserAction::Manual => {
                let error = context.error.trim();
                let message = format!("Digite a correção manual para \"{error}\":");
                match self.surface.prompt_text(&message, error).await? {
                    Some(value) => (Resolution::Manual(value), "Aplicando correção manual..."),
                    None => (Resolution::Skip, "Operação manual cancelada."),
                }
            }
            UserAction::Skip => (Resolution::Skip, "Pulando erro..."),
        };

        self.surface.show_applying(applying).await?;
        Ok(resolution)
    }

    /// Brief "applying" transition for a replacement taken without asking.
    pub async fn show_auto(&self, error: &str, replacement: &str) -> Result<(), DecisionError> {
        self.surface
            .show_applying(&format!("Aplicando: {} → {}", error.trim(), replacement))
            .await
    }

    /// `None` when the dialog is dismissed without a mode.
    pub async fn choose_mode(&self) -> Result<Option<CorrectionMode>, DecisionError> {
        let dialog = Dialog::new(MODE_DIALOG, "Escolha o modo de correção:", DialogTone::Question)
            .with_button(DialogButton::secondary("Básico", "basic"))
            .with_button(DialogButton::new("Avançado", "advanced"));
        let value = self.surface.ask(&dialog).await?;
        Ok(value.parse().ok())
    }

    pub async fn confirm_basic(&self) -> Result<bool, DecisionError> {
        let dialog = Dialog::new(
            BASIC_CONFIRM_DIALOG,
            "Modo Básico:\nA correção será totalmente automática (usará a primeira sugestão do site).\nNenhuma tela de correção será exibida.",
            DialogTone::Warning,
        )
        .with_button(DialogButton::secondary("Cancelar", "false"))
        .with_button(DialogButton::new("Continuar (Básico)", "true"));
        Ok(self.surface.ask(&dialog).await? == "true")
    }

    pub async fn offer_review(&self) -> Result<bool, DecisionError> {
        let dialog = Dialog::new(
            REVIEW_DIALOG,
            "Revisão Final pela IA\nÓtimo! Você terminou as etapas.\nDeseja que uma IA dê uma última vistoria no texto?",
            DialogTone::Question,
        )
        .with_button(DialogButton::secondary("Não", "false"))
        .with_button(DialogButton::new("Sim", "true"));
        Ok(self.surface.ask(&dialog).await? == "true")
    }

    pub async fn confirm_generation(&self) -> Result<bool, DecisionError> {
        let dialog = Dialog::new(
            GENERATION_CONFIRM_DIALOG,
            "A IA gerará um texto automaticamente pra você.\nÉ um processo que pode demorar de 1 a 2 minutos.\n\nProsseguir?",
            DialogTone::Question,
        )
        .with_button(DialogButton::secondary("Não", "false"))
        .with_button(DialogButton::new("Sim", "true"));
        Ok(self.surface.ask(&dialog).await? == "true")
    }

    pub async fn choose_write_mode(&self) -> Result<WriteMode, DecisionError> {
        let dialog = Dialog::new(
            WRITE_MODE_DIALOG,
            "Como você deseja inserir o texto gerado?",
            DialogTone::Question,
        )
        .with_button(DialogButton::secondary("Cancelar", "cancel"))
        .with_button(DialogButton::new("Escrever no final do texto", "append"))
        .with_button(DialogButton::new("Substituir o texto atual", "replace"));
        let mode = match self.surface.ask(&dialog).await?.as_str() {
            "append" => WriteMode::Append,
            "replace" => WriteMode::Replace,
            _ => WriteMode::Cancel,
        };
        Ok(mode)
    }

    /// Single-button alert.
    pub async fn notify(&self, message: &str, severity: Severity) -> Result<(), DecisionError> {
        self.surface
            .ask(&Dialog::alert(message, severity.into()))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
