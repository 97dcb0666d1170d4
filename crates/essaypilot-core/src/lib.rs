//! Correction orchestration engine, typing service and AI workflows.
//!
//! Everything here talks to the browser through
//! [`HostPage`](essaypilot_protocols::HostPage) and to the user through
//! [`DecisionSurface`](essaypilot_protocols::DecisionSurface), so the
//! engine runs unchanged against the CDP adapter or the in-memory doubles
//! of the `testing` module.

pub mod busy;
pub mod context;
pub mod corrector;
pub mod decision;
pub mod error;
pub mod generation;
pub mod report;
pub mod review;
pub mod typing;
pub mod wait;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use busy::{BusyFlag, BusyGuard};
pub use context::{error_context, extract_context, format_context};
pub use corrector::{Corrector, CorrectorButton, Phase, Session};
pub use decision::DecisionUi;
pub use error::{CorrectionError, TypingError, WaitError, WorkflowError};
pub use generation::{EssayGenerator, GenerationOutcome};
pub use report::{CorrectionOutcome, CorrectionReport, CorrectionTally, MarkerOutcome};
pub use review::AiReview;
pub use typing::{Typist, TypingStats};
pub use wait::{wait_until, Disappearance, DomWaiter};
