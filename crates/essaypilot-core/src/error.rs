//! Error types for the essaypilot engine.

use essaypilot_protocols::{AiError, DecisionError, PageError};
use thiserror::Error;

/// Bounded waits.
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("Timeout waiting for element: {selector} ({waited_ms}ms)")]
    Timeout { selector: String, waited_ms: u64 },

    #[error(transparent)]
    Page(#[from] PageError),
}

/// Keystroke simulation and buffer clearing.
#[derive(Debug, Error)]
pub enum TypingError {
    #[error("Target element is not attached: {0}")]
    TargetDetached(String),

    #[error("Aguarde a correção automática terminar antes de digitar.")]
    Busy,

    #[error("Nothing to type")]
    EmptyText,

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Decision(#[from] DecisionError),
}

/// Failures that abort a correction run before the buffer is touched, plus
/// unexpected page or surface failures outside the per-marker loop.
#[derive(Debug, Error)]
pub enum CorrectionError {
    #[error("Correção já em andamento.")]
    Busy,

    #[error("Textarea alvo não encontrada! Verifique o seletor.")]
    TargetNotFound,

    #[error("'Corrigir Online' está em processo de espera (\"{0}\"). Tente novamente mais tarde.")]
    CorrectorCoolingDown(String),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Decision(#[from] DecisionError),
}

impl CorrectionError {
    /// Precondition failures are reported to the user as is.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            CorrectionError::Busy
                | CorrectionError::TargetNotFound
                | CorrectionError::CorrectorCoolingDown(_)
        )
    }
}

/// AI review and generation workflows.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("A caixa de texto está vazia, não há nada para revisar.")]
    EmptyBuffer,

    #[error("Não foi possível extrair o contexto necessário da página.")]
    ContextMissing,

    #[error("Não foi possível encontrar a área de texto principal na página para escrever.")]
    TargetNotFound,

    #[error("Não foi possível limpar a área de texto antes de escrever.")]
    ClearFailed,

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error(transparent)]
    Typing(#[from] TypingError),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Decision(#[from] DecisionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_timeout_display() {
        let err = WaitError::Timeout {
            selector: "ul#menu-list-grow".to_string(),
            waited_ms: 1500,
        };
        let display = err.to_string();
        assert!(display.contains("ul#menu-list-grow"));
        assert!(display.contains("1500ms"));
    }

    #[test]
    fn test_cooling_down_carries_label() {
        let err = CorrectionError::CorrectorCoolingDown("CORRIGIR ONLINE (aguarde)".to_string());
        assert!(err.to_string().contains("\"CORRIGIR ONLINE (aguarde)\""));
        assert!(err.is_precondition());
    }

    #[test]
    fn test_page_error_not_precondition() {
        let err = CorrectionError::from(PageError::Transport("socket closed".to_string()));
        assert!(!err.is_precondition());
        assert!(err.to_string().contains("socket closed"));
    }

    #[test]
    fn test_workflow_wraps_ai_error() {
        let err = WorkflowError::from(AiError::Network("refused".to_string()));
        assert!(matches!(err, WorkflowError::Ai(_)));
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn test_typing_detached_display() {
        let err = TypingError::TargetDetached("textarea#essay".to_string());
        assert!(err.to_string().contains("textarea#essay"));
    }
}
