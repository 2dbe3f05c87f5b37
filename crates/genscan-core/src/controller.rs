//! Submission lifecycle: validate, dispatch, apply.
//!
//! A submission is split in three so the owner of the UI state never holds it
//! across an await:
//!
//! 1. [`SubmissionController::prepare`] runs synchronously, checks the health
//!    gate and the input, and stamps the request with a sequence number.
//! 2. [`PreparedSubmission::dispatch`] performs the network call. It borrows
//!    nothing from the controller and can run on any task.
//! 3. [`SubmissionController::apply`] folds the outcome back in. Only the most
//!    recently issued submission is applied; anything older is dropped.

use crate::backend::DetectionBackend;
use crate::error::{DetectError, ValidationError};
use crate::health::BackendHealth;
use crate::input::InputPanel;
use crate::media::ImageFile;
use crate::{DetectionMode, DetectionResult, Notification, UiError};

/// What the result area currently holds.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultSlot {
    #[default]
    Empty,
    /// From the latest applied submission, which succeeded.
    Fresh(DetectionResult),
    /// The last good answer, kept after a later submission failed.
    Stale(DetectionResult),
}

impl ResultSlot {
    pub fn result(&self) -> Option<&DetectionResult> {
        match self {
            ResultSlot::Empty => None,
            ResultSlot::Fresh(r) | ResultSlot::Stale(r) => Some(r),
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, ResultSlot::Stale(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ResultSlot::Empty)
    }

    fn mark_stale(&mut self) {
        *self = match std::mem::take(self) {
            ResultSlot::Fresh(r) | ResultSlot::Stale(r) => ResultSlot::Stale(r),
            ResultSlot::Empty => ResultSlot::Empty,
        };
    }
}

/// Payload of a validated submission.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionRequest {
    Image(ImageFile),
    /// Sent untrimmed; trimming is only used to reject blank input.
    Text(String),
}

impl DetectionRequest {
    pub fn mode(&self) -> DetectionMode {
        match self {
            DetectionRequest::Image(_) => DetectionMode::ImageDetection,
            DetectionRequest::Text(_) => DetectionMode::TextDetection,
        }
    }
}

/// A request that passed validation and is ready to send.
#[derive(Debug, Clone)]
pub struct PreparedSubmission {
    seq: u64,
    request: DetectionRequest,
}

impl PreparedSubmission {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn mode(&self) -> DetectionMode {
        self.request.mode()
    }

    pub fn request(&self) -> &DetectionRequest {
        &self.request
    }

    /// Send the request and wait for the service's answer.
    pub async fn dispatch(self, backend: &dyn DetectionBackend) -> SubmissionOutcome {
        let mode = self.request.mode();
        let result = match &self.request {
            DetectionRequest::Image(image) => backend.detect_image(image).await,
            DetectionRequest::Text(text) => backend.detect_text(text).await,
        };
        SubmissionOutcome {
            seq: self.seq,
            mode,
            result,
        }
    }
}

/// The answer to one dispatched submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub seq: u64,
    pub mode: DetectionMode,
    pub result: Result<DetectionResult, DetectError>,
}

/// Effect of applying an outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Succeeded(Notification),
    Failed(Notification),
    /// A newer submission was issued (or the controller was reset) after this
    /// one; the outcome was discarded.
    Superseded,
}

impl Applied {
    pub fn notification(&self) -> Option<&Notification> {
        match self {
            Applied::Succeeded(n) | Applied::Failed(n) => Some(n),
            Applied::Superseded => None,
        }
    }
}

/// Owns the result slot and the last error for a session.
#[derive(Debug, Default)]
pub struct SubmissionController {
    next_seq: u64,
    /// Sequence number of the submission whose outcome will be applied.
    awaiting: Option<u64>,
    slot: ResultSlot,
    last_error: Option<UiError>,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare a submission for the panel's active mode.
    pub fn prepare(
        &mut self,
        panel: &InputPanel,
        health: BackendHealth,
    ) -> Result<PreparedSubmission, DetectError> {
        match panel.mode() {
            DetectionMode::ImageDetection => self.prepare_image(panel, health),
            DetectionMode::TextDetection => self.prepare_text(panel, health),
        }
    }

    pub fn prepare_image(
        &mut self,
        panel: &InputPanel,
        health: BackendHealth,
    ) -> Result<PreparedSubmission, DetectError> {
        check_gate(health)?;
        let image = panel.image().ok_or(ValidationError::NoImageSelected)?;
        Ok(self.issue(DetectionRequest::Image(image.clone())))
    }

    pub fn prepare_text(
        &mut self,
        panel: &InputPanel,
        health: BackendHealth,
    ) -> Result<PreparedSubmission, DetectError> {
        check_gate(health)?;
        if panel.text().trim().is_empty() {
            return Err(ValidationError::EmptyText.into());
        }
        Ok(self.issue(DetectionRequest::Text(panel.text().to_string())))
    }

    fn issue(&mut self, request: DetectionRequest) -> PreparedSubmission {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.awaiting = Some(seq);
        tracing::info!(seq, mode = request.mode().label(), "submission issued");
        PreparedSubmission { seq, request }
    }

    /// Record a submission that never left the client and return its notification.
    ///
    /// The displayed result is left untouched.
    pub fn reject(&mut self, err: &DetectError, mode: DetectionMode) -> Notification {
        if err.is_validation() {
            tracing::debug!(error = %err, "submission rejected");
        } else {
            tracing::info!(error = %err, "submission refused");
        }
        let message = err.user_message(mode);
        self.last_error = Some(UiError {
            message: message.clone(),
        });
        Notification::error(message)
    }

    /// Fold a dispatched outcome back into the controller.
    pub fn apply(&mut self, outcome: SubmissionOutcome) -> Applied {
        if self.awaiting != Some(outcome.seq) {
            tracing::debug!(
                seq = outcome.seq,
                awaiting = ?self.awaiting,
                "discarding superseded outcome"
            );
            return Applied::Superseded;
        }
        self.awaiting = None;

        match outcome.result {
            Ok(result) => {
                tracing::info!(
                    seq = outcome.seq,
                    verdict = %result.verdict,
                    confidence = result.confidence,
                    "detection complete"
                );
                self.slot = ResultSlot::Fresh(result);
                self.last_error = None;
                Applied::Succeeded(Notification::success(success_message(outcome.mode)))
            }
            Err(err) => {
                tracing::warn!(seq = outcome.seq, error = %err, "detection failed");
                let message = err.user_message(outcome.mode);
                self.slot.mark_stale();
                self.last_error = Some(UiError {
                    message: message.clone(),
                });
                Applied::Failed(Notification::error(message))
            }
        }
    }

    /// Clear the result and drop any outcome still in flight.
    pub fn reset(&mut self) {
        if let Some(seq) = self.awaiting.take() {
            tracing::debug!(seq, "in-flight submission invalidated");
        }
        self.slot = ResultSlot::Empty;
        self.last_error = None;
    }

    pub fn slot(&self) -> &ResultSlot {
        &self.slot
    }

    pub fn last_error(&self) -> Option<&UiError> {
        self.last_error.as_ref()
    }

    /// Whether the latest issued submission has not been applied yet.
    pub fn is_pending(&self) -> bool {
        self.awaiting.is_some()
    }
}

fn check_gate(health: BackendHealth) -> Result<(), DetectError> {
    if health.is_usable() {
        Ok(())
    } else {
        Err(DetectError::Unavailable(health))
    }
}

fn success_message(mode: DetectionMode) -> &'static str {
    match mode {
        DetectionMode::ImageDetection => "Image scan done!",
        DetectionMode::TextDetection => "Text analysis done!",
    }
}
