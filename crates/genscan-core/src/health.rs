//! Backend liveness polling.
//!
//! A [`HealthMonitor`] owns one background task that probes `/health` on a
//! fixed cadence and publishes the latest [`BackendHealth`] through a
//! `watch` channel. Consumers never await a probe; they read the cached value.
//! Each probe is awaited inside its tick, so probes never overlap, and a failed
//! probe is only retried by the next scheduled tick.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::backend::DetectionBackend;
use crate::error::DetectError;

/// Indicator value the service reports while a model is still loading.
const LOADING: &str = "loading";

/// Body of a successful `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub clip_model_loading: String,
    pub text_model_status: String,
}

impl HealthReport {
    pub fn new(clip_model_loading: impl Into<String>, text_model_status: impl Into<String>) -> Self {
        Self {
            clip_model_loading: clip_model_loading.into(),
            text_model_status: text_model_status.into(),
        }
    }
}

/// Latest known availability of the detection service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendHealth {
    /// No probe has been issued yet.
    #[default]
    Unknown,
    /// The very first probe is in flight.
    Checking,
    Ready,
    ModelLoading,
    Unreachable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryLevel {
    Warning,
    Error,
}

impl BackendHealth {
    /// Whether submissions may be triggered in this state.
    pub fn is_usable(self) -> bool {
        !matches!(self, BackendHealth::ModelLoading | BackendHealth::Unreachable)
    }

    pub fn advisory(self) -> &'static str {
        match self {
            BackendHealth::Unknown | BackendHealth::Checking => "Loading models...",
            BackendHealth::Ready => "Backend is running.",
            BackendHealth::ModelLoading => "Model is loading... Please wait...",
            BackendHealth::Unreachable => "Backend is not running. Please start the server...",
        }
    }

    /// Severity of the banner to show, if any.
    pub fn advisory_level(self) -> Option<AdvisoryLevel> {
        match self {
            BackendHealth::ModelLoading => Some(AdvisoryLevel::Warning),
            BackendHealth::Unreachable => Some(AdvisoryLevel::Error),
            _ => None,
        }
    }

    /// Whether at least one probe has resolved.
    pub fn is_resolved(self) -> bool {
        !matches!(self, BackendHealth::Unknown | BackendHealth::Checking)
    }

    pub fn label(self) -> &'static str {
        match self {
            BackendHealth::Unknown => "unknown",
            BackendHealth::Checking => "checking",
            BackendHealth::Ready => "ready",
            BackendHealth::ModelLoading => "model loading",
            BackendHealth::Unreachable => "unreachable",
        }
    }
}

/// Classify a successful health reply.
pub fn classify(report: &HealthReport) -> BackendHealth {
    if report.clip_model_loading == LOADING || report.text_model_status == LOADING {
        BackendHealth::ModelLoading
    } else {
        BackendHealth::Ready
    }
}

/// Classify the outcome of a probe. Any failure means unreachable.
pub fn classify_probe(probe: Result<HealthReport, DetectError>) -> BackendHealth {
    match probe {
        Ok(report) => classify(&report),
        Err(e) => {
            tracing::debug!(error = %e, "health probe failed");
            BackendHealth::Unreachable
        }
    }
}

/// Background poller publishing [`BackendHealth`].
pub struct HealthMonitor {
    rx: watch::Receiver<BackendHealth>,
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

impl HealthMonitor {
    /// Start polling immediately. The task runs until `cancel` fires.
    pub fn spawn(
        backend: Arc<dyn DetectionBackend>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        let (tx, rx) = watch::channel(BackendHealth::Unknown);
        let handle = tokio::spawn(poll_loop(backend, interval, tx, cancel.clone()));
        Self { rx, handle, cancel }
    }

    pub fn subscribe(&self) -> watch::Receiver<BackendHealth> {
        self.rx.clone()
    }

    pub fn current(&self) -> BackendHealth {
        *self.rx.borrow()
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the poller and wait for the task to exit. A panicked poller
    /// is logged, not propagated.
    pub async fn stop(self) {
        self.cancel.cancel();
        match self.handle.await {
            Err(e) if e.is_panic() => tracing::warn!(error = %e, "health poller panicked"),
            _ => {}
        }
    }
}

async fn poll_loop(
    backend: Arc<dyn DetectionBackend>,
    period: Duration,
    tx: watch::Sender<BackendHealth>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut first_probe = true;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        if first_probe {
            tx.send_replace(BackendHealth::Checking);
            first_probe = false;
        }

        let probe = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            probe = backend.health() => probe,
        };

        let next = classify_probe(probe);
        let prev = tx.send_replace(next);
        if prev != next {
            tracing::info!(
                backend = backend.name(),
                from = prev.label(),
                to = next.label(),
                "backend health changed"
            );
        } else {
            tracing::trace!(backend = backend.name(), state = next.label(), "health probe");
        }
    }

    tracing::debug!(backend = backend.name(), "health monitor stopped");
}
