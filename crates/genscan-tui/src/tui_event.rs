use genscan_core::{PreparedSubmission, SubmissionOutcome};

/// Commands sent from the TUI to the backend.
#[derive(Debug)]
pub enum BackendCommand {
    /// Dispatch a validated submission on its own task.
    Submit(PreparedSubmission),
}

/// Events flowing from backend tasks to the TUI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// A dispatched submission got its answer (or failed).
    SubmissionFinished(SubmissionOutcome),
}
