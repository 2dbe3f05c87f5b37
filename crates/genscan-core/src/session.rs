//! One client session: the input state, the submission controller and the
//! health monitor that feeds its gate.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::backend::DetectionBackend;
use crate::controller::{Applied, PreparedSubmission, ResultSlot, SubmissionController, SubmissionOutcome};
use crate::error::DetectError;
use crate::health::{BackendHealth, HealthMonitor};
use crate::input::InputPanel;
use crate::media::{ImageFile, MediaChange};
use crate::presenter::{self, ResultView};
use crate::{DetectionMode, Notification, SessionConfig, UiError};

pub struct Session {
    backend: Arc<dyn DetectionBackend>,
    panel: InputPanel,
    controller: SubmissionController,
    monitor: Option<HealthMonitor>,
    health_rx: watch::Receiver<BackendHealth>,
    cancel: CancellationToken,
}

impl Session {
    /// Create a session and start polling the backend's health.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(backend: Arc<dyn DetectionBackend>, config: &SessionConfig) -> Self {
        let cancel = CancellationToken::new();
        let monitor = HealthMonitor::spawn(backend.clone(), config.poll_interval, cancel.clone());
        let health_rx = monitor.subscribe();
        tracing::info!(
            backend = backend.name(),
            poll_secs = config.poll_interval.as_secs_f64(),
            "session started"
        );
        Self {
            backend,
            panel: InputPanel::new(),
            controller: SubmissionController::new(),
            monitor: Some(monitor),
            health_rx,
            cancel,
        }
    }

    pub fn backend(&self) -> Arc<dyn DetectionBackend> {
        self.backend.clone()
    }

    pub fn mode(&self) -> DetectionMode {
        self.panel.mode()
    }

    /// Switch mode. Always clears the displayed result and drops any
    /// submission still in flight.
    pub fn set_mode(&mut self, mode: DetectionMode) -> bool {
        let changed = self.panel.set_mode(mode);
        self.controller.reset();
        changed
    }

    pub fn capture_image(&mut self, file: Option<ImageFile>) -> MediaChange {
        self.panel.capture_image(file)
    }

    pub fn capture_text(&mut self, value: impl Into<String>) {
        self.panel.capture_text(value);
    }

    pub fn panel(&self) -> &InputPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut InputPanel {
        &mut self.panel
    }

    pub fn health(&self) -> BackendHealth {
        *self.health_rx.borrow()
    }

    pub fn health_receiver(&self) -> watch::Receiver<BackendHealth> {
        self.health_rx.clone()
    }

    /// Whether the submit trigger should be enabled.
    pub fn can_submit(&self) -> bool {
        self.health().is_usable()
    }

    /// Validate the active mode's input and stamp a new submission.
    ///
    /// On failure the error is already recorded and the returned notification
    /// is ready to show.
    pub fn begin_submit(&mut self) -> Result<PreparedSubmission, Notification> {
        let health = self.health();
        let mode = self.panel.mode();
        self.controller
            .prepare(&self.panel, health)
            .map_err(|e| self.controller.reject(&e, mode))
    }

    pub fn apply(&mut self, outcome: SubmissionOutcome) -> Applied {
        self.controller.apply(outcome)
    }

    /// Prepare, dispatch and apply a submission for the active mode.
    pub async fn submit(&mut self) -> Notification {
        match self.begin_submit() {
            Ok(prepared) => {
                let backend = self.backend.clone();
                let outcome = prepared.dispatch(backend.as_ref()).await;
                match self.controller.apply(outcome) {
                    Applied::Succeeded(n) | Applied::Failed(n) => n,
                    // Nothing else can issue while we hold `&mut self`.
                    Applied::Superseded => Notification::info("Submission superseded."),
                }
            }
            Err(notification) => notification,
        }
    }

    /// Switch to image mode and submit the held image.
    pub async fn submit_image(&mut self) -> Notification {
        self.switch_to(DetectionMode::ImageDetection);
        self.submit().await
    }

    /// Switch to text mode and submit the held text.
    pub async fn submit_text(&mut self) -> Notification {
        self.switch_to(DetectionMode::TextDetection);
        self.submit().await
    }

    /// `set_mode`, skipped when `mode` is already active.
    fn switch_to(&mut self, mode: DetectionMode) {
        if self.panel.mode() != mode {
            self.set_mode(mode);
        }
    }

    pub fn result_slot(&self) -> &ResultSlot {
        self.controller.slot()
    }

    pub fn result_view(&self) -> Option<ResultView> {
        presenter::present(self.controller.slot())
    }

    pub fn last_error(&self) -> Option<&UiError> {
        self.controller.last_error()
    }

    pub fn is_submitting(&self) -> bool {
        self.controller.is_pending()
    }

    /// Wait for the first probe to resolve and return its classification.
    pub async fn wait_for_probe(&mut self) -> Result<BackendHealth, DetectError> {
        let health = self
            .health_rx
            .wait_for(|h| h.is_resolved())
            .await
            .map_err(|_| DetectError::Transport("health monitor stopped".to_string()))?;
        Ok(*health)
    }

    /// Stop the health monitor and wait for it to exit. Idempotent.
    pub async fn shutdown(&mut self) {
        if let Some(monitor) = self.monitor.take() {
            monitor.stop().await;
            tracing::info!(backend = self.backend.name(), "session stopped");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
