//! Correction tally and the terminal report of a run.

use std::fmt;

use essaypilot_protocols::{CorrectionMode, Severity};

/// How one marker ended up being counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerOutcome {
    Corrected,
    Skipped,
    Errored,
}

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionTally {
    pub corrected: usize,
    pub skipped: usize,
    pub errored: usize,
}

impl CorrectionTally {
    pub fn new(corrected: usize, skipped: usize, errored: usize) -> Self {
        Self {
            corrected,
            skipped,
            errored,
        }
    }

    pub fn record(&mut self, outcome: MarkerOutcome) {
        match outcome {
            MarkerOutcome::Corrected => self.corrected += 1,
            MarkerOutcome::Skipped => self.skipped += 1,
            MarkerOutcome::Errored => self.errored += 1,
        }
    }

    pub fn processed(&self) -> usize {
        self.corrected + self.skipped + self.errored
    }
}

impl fmt::Display for CorrectionTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} corrected, {} skipped, {} errored",
            self.corrected, self.skipped, self.errored
        )
    }
}

/// Terminal classification of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionOutcome {
    /// Every marker was processed.
    Completed,
    /// The page already showed its conclude button.
    AlreadyConcluded,
    /// No markers were present.
    NothingToDo,
    /// The iteration bound ended the loop with markers left.
    IterationLimit,
    /// The user declined the mode selection or confirmation.
    Cancelled,
}

impl CorrectionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionOutcome::Completed => "completed",
            CorrectionOutcome::AlreadyConcluded => "already_concluded",
            CorrectionOutcome::NothingToDo => "nothing_to_do",
            CorrectionOutcome::IterationLimit => "iteration_limit",
            CorrectionOutcome::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for CorrectionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one correction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionReport {
    pub tally: CorrectionTally,
    pub message: String,
    pub severity: Severity,
    pub outcome: CorrectionOutcome,
    pub mode: Option<CorrectionMode>,
    pub markers_at_start: usize,
}

impl CorrectionReport {
    fn new(
        outcome: CorrectionOutcome,
        message: impl Into<String>,
        severity: Severity,
        mode: Option<CorrectionMode>,
    ) -> Self {
        Self {
            tally: CorrectionTally::default(),
            message: message.into(),
            severity,
            outcome,
            mode,
            markers_at_start: 0,
        }
    }

    pub fn cancelled() -> Self {
        Self::new(
            CorrectionOutcome::Cancelled,
            "Correção cancelada.",
            Severity::Info,
            None,
        )
    }

    pub fn already_concluded(mode: CorrectionMode) -> Self {
        Self::new(
            CorrectionOutcome::AlreadyConcluded,
            "O texto já parece estar corrigido (botão 'Concluir' visível).",
            Severity::Success,
            Some(mode),
        )
    }

    pub fn nothing_to_do(mode: CorrectionMode) -> Self {
        Self::new(
            CorrectionOutcome::NothingToDo,
            "Nenhum erro encontrado para correção (baseado nos marcadores visíveis).",
            Severity::Info,
            Some(mode),
        )
    }

    /// Report for a loop that ran over `markers_at_start` markers.
    pub fn from_tally(
        tally: CorrectionTally,
        markers_at_start: usize,
        hit_limit: bool,
        mode: CorrectionMode,
    ) -> Self {
        let (outcome, message, severity) = if hit_limit {
            (
                CorrectionOutcome::IterationLimit,
                "Processo de correção interrompido (limite de iterações). Pode haver erros restantes."
                    .to_string(),
                Severity::Warning,
            )
        } else {
            let (message, severity) = summarize(&tally);
            (CorrectionOutcome::Completed, message, severity)
        };
        Self {
            tally,
            message,
            severity,
            outcome,
            mode: Some(mode),
            markers_at_start,
        }
    }

    /// Mark the AI review pass as applied.
    pub fn with_review_applied(mut self) -> Self {
        self.message.push_str("\nRevisão final da IA aplicada.");
        self.severity = Severity::Success;
        self
    }
}

/// Final message and severity for a loop that ended normally.
pub fn summarize(tally: &CorrectionTally) -> (String, Severity) {
    if tally.processed() == 0 {
        return (
            "Foram encontrados erros inicialmente, mas nenhum foi processado (possivelmente já corrigidos ou inválidos)."
                .to_string(),
            Severity::Warning,
        );
    }

    if tally.corrected > 0 && tally.skipped == 0 && tally.errored == 0 {
        return (
            format!(
                "Correção finalizada! {} erros processados com sucesso.",
                tally.corrected
            ),
            Severity::Success,
        );
    }

    let mut message = format!(
        "Correção concluída: {} corrigido(s), {} pulado(s)",
        tally.corrected, tally.skipped
    );
    if tally.errored > 0 {
        message.push_str(&format!(", {} erro(s) durante o processo.", tally.errored));
    }
    let severity = if tally.errored > 0 {
        Severity::Warning
    } else if tally.corrected > 0 {
        Severity::Success
    } else {
        Severity::Info
    };
    (message, severity)
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
