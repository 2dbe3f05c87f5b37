//! Detection service trait and wire schemas.

pub mod http;
pub mod mock;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::DetectError;
use crate::health::HealthReport;
use crate::media::ImageFile;
use crate::DetectionResult;

pub const HEALTH_PATH: &str = "/health";
pub const DETECT_IMAGE_PATH: &str = "/detect-image";
pub const DETECT_TEXT_PATH: &str = "/detect-text";
/// Multipart field carrying the image bytes.
pub const IMAGE_FIELD: &str = "image";

pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, DetectError>> + Send + 'a>>;

/// A detection service the client can probe and submit content to.
pub trait DetectionBackend: Send + Sync {
    /// Short name used in logs (e.g. the base URL).
    fn name(&self) -> &str;

    /// Liveness probe (`GET /health`).
    fn health(&self) -> BackendFuture<'_, HealthReport>;

    /// Classify an image (`POST /detect-image`, multipart).
    fn detect_image<'a>(&'a self, image: &'a ImageFile) -> BackendFuture<'a, DetectionResult>;

    /// Classify a block of text (`POST /detect-text`, JSON).
    fn detect_text<'a>(&'a self, text: &'a str) -> BackendFuture<'a, DetectionResult>;
}

/// Body of `POST /detect-text`.
#[derive(Debug, Serialize)]
pub struct TextRequest<'a> {
    pub text: &'a str,
}

/// Success body of both detection endpoints.
#[derive(Debug, Deserialize)]
pub struct DetectionResponse {
    pub result: String,
    pub confidence: f64,
}

impl DetectionResponse {
    /// Validate the response and convert it into a [`DetectionResult`].
    pub fn into_result(self) -> Result<DetectionResult, DetectError> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(DetectError::Transport(format!(
                "confidence out of range: {}",
                self.confidence
            )));
        }
        Ok(DetectionResult {
            verdict: self.result,
            confidence: self.confidence,
        })
    }
}

/// Optional body of an error response.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Map a non-2xx response to a service error when it carries a usable
/// `error` field, otherwise to a transport error.
pub fn error_from_body(status: u16, body: &str) -> DetectError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.error.trim().is_empty() => DetectError::Service {
            status,
            message: parsed.error,
        },
        _ => DetectError::Transport(format!("HTTP {}", status)),
    }
}

/// Parse a detection success body.
pub fn parse_detection_body(body: &str) -> Result<DetectionResult, DetectError> {
    serde_json::from_str::<DetectionResponse>(body)
        .map_err(|e| DetectError::Transport(format!("unexpected detection response: {}", e)))?
        .into_result()
}

/// Parse a health success body.
pub fn parse_health_body(body: &str) -> Result<HealthReport, DetectError> {
    serde_json::from_str::<HealthReport>(body)
        .map_err(|e| DetectError::Transport(format!("unexpected health response: {}", e)))
}
