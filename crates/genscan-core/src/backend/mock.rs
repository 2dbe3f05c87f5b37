//! Scripted detection backend for tests and offline demos.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{BackendFuture, DetectionBackend};
use crate::error::DetectError;
use crate::health::HealthReport;
use crate::media::ImageFile;
use crate::DetectionResult;

/// A configurable reply to a detection call.
#[derive(Clone, Debug)]
pub enum MockReply {
    Verdict { verdict: String, confidence: f64 },
    /// Non-2xx with an `{ "error": ... }` body.
    Service { status: u16, message: String },
    /// Network failure or unusable body.
    Transport(String),
}

impl MockReply {
    pub fn verdict(verdict: impl Into<String>, confidence: f64) -> Self {
        MockReply::Verdict {
            verdict: verdict.into(),
            confidence,
        }
    }

    fn into_result(self) -> Result<DetectionResult, DetectError> {
        match self {
            MockReply::Verdict {
                verdict,
                confidence,
            } => Ok(DetectionResult {
                verdict,
                confidence,
            }),
            MockReply::Service { status, message } => Err(DetectError::Service { status, message }),
            MockReply::Transport(msg) => Err(DetectError::Transport(msg)),
        }
    }
}

/// A configurable reply to a health probe.
#[derive(Clone, Debug)]
pub enum MockHealth {
    Status { clip: String, text: String },
    Down,
}

impl MockHealth {
    pub fn status(clip: impl Into<String>, text: impl Into<String>) -> Self {
        MockHealth::Status {
            clip: clip.into(),
            text: text.into(),
        }
    }
}

/// A hand-rolled mock implementing [`DetectionBackend`].
///
/// Supports:
/// - a fixed reply, **or** a sequence of replies (one per call, repeating the last),
/// - per-call latency for health probes and for detection calls,
/// - call counting and capture of the last submitted payload.
pub struct MockBackend {
    health: Mutex<Vec<MockHealth>>,
    health_fallback: MockHealth,
    health_delay: Option<Duration>,
    replies: Mutex<Vec<MockReply>>,
    reply_fallback: MockReply,
    /// Popped per detection call; empty means no delay.
    reply_delays: Mutex<Vec<Duration>>,
    health_calls: AtomicUsize,
    health_inflight: AtomicUsize,
    max_health_inflight: AtomicUsize,
    image_calls: AtomicUsize,
    text_calls: AtomicUsize,
    last_text: Mutex<Option<String>>,
    last_image: Mutex<Option<String>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// A backend that is ready and judges everything human-written.
    pub fn new() -> Self {
        Self {
            health: Mutex::new(Vec::new()),
            health_fallback: MockHealth::status("running", "running"),
            health_delay: None,
            replies: Mutex::new(Vec::new()),
            reply_fallback: MockReply::verdict("Human-written", 0.5),
            reply_delays: Mutex::new(Vec::new()),
            health_calls: AtomicUsize::new(0),
            health_inflight: AtomicUsize::new(0),
            max_health_inflight: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
            text_calls: AtomicUsize::new(0),
            last_text: Mutex::new(None),
            last_image: Mutex::new(None),
        }
    }

    pub fn with_health(mut self, health: MockHealth) -> Self {
        self.health_fallback = health;
        self
    }

    /// Health replies in order, repeating the last one.
    pub fn with_health_sequence(mut self, mut sequence: Vec<MockHealth>) -> Self {
        assert!(!sequence.is_empty(), "sequence must have at least one reply");
        // Reverse so we can pop() from the front cheaply.
        sequence.reverse();
        self.health_fallback = sequence[0].clone();
        self.health = Mutex::new(sequence);
        self
    }

    pub fn with_health_delay(mut self, delay: Duration) -> Self {
        self.health_delay = Some(delay);
        self
    }

    pub fn with_reply(mut self, reply: MockReply) -> Self {
        self.reply_fallback = reply;
        self
    }

    /// Detection replies in order, repeating the last one.
    pub fn with_reply_sequence(mut self, mut sequence: Vec<MockReply>) -> Self {
        assert!(!sequence.is_empty(), "sequence must have at least one reply");
        sequence.reverse();
        self.reply_fallback = sequence[0].clone();
        self.replies = Mutex::new(sequence);
        self
    }

    /// Latency for successive detection calls, in call order.
    pub fn with_reply_delays(mut self, mut delays: Vec<Duration>) -> Self {
        delays.reverse();
        self.reply_delays = Mutex::new(delays);
        self
    }

    pub fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    /// Highest number of health probes observed in flight at once.
    pub fn max_concurrent_health(&self) -> usize {
        self.max_health_inflight.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    /// Total detection calls of either kind.
    pub fn detection_calls(&self) -> usize {
        self.image_calls() + self.text_calls()
    }

    pub fn last_text(&self) -> Option<String> {
        self.last_text.lock().unwrap().clone()
    }

    /// File name of the last submitted image.
    pub fn last_image(&self) -> Option<String> {
        self.last_image.lock().unwrap().clone()
    }

    fn next_health(&self) -> MockHealth {
        self.health
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| self.health_fallback.clone())
    }

    fn next_reply(&self) -> (MockReply, Option<Duration>) {
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| self.reply_fallback.clone());
        let delay = self.reply_delays.lock().unwrap().pop();
        (reply, delay)
    }

    fn reply_future(&self, reply: MockReply, delay: Option<Duration>) -> BackendFuture<'_, DetectionResult> {
        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            reply.into_result()
        })
    }
}

impl DetectionBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn health(&self) -> BackendFuture<'_, HealthReport> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.next_health();
        let delay = self.health_delay;

        Box::pin(async move {
            let inflight = self.health_inflight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_health_inflight.fetch_max(inflight, Ordering::SeqCst);

            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            self.health_inflight.fetch_sub(1, Ordering::SeqCst);

            match reply {
                MockHealth::Status { clip, text } => Ok(HealthReport::new(clip, text)),
                MockHealth::Down => Err(DetectError::Transport("connection refused".into())),
            }
        })
    }

    fn detect_image<'a>(&'a self, image: &'a ImageFile) -> BackendFuture<'a, DetectionResult> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_image.lock().unwrap() = Some(image.name().to_string());
        let (reply, delay) = self.next_reply();
        self.reply_future(reply, delay)
    }

    fn detect_text<'a>(&'a self, text: &'a str) -> BackendFuture<'a, DetectionResult> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_text.lock().unwrap() = Some(text.to_string());
        let (reply, delay) = self.next_reply();
        self.reply_future(reply, delay)
    }
}
