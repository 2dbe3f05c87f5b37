use thiserror::Error;

use crate::DetectionMode;
use crate::health::BackendHealth;

/// Input problems caught before anything touches the network.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no image selected")]
    NoImageSelected,
    #[error("empty text")]
    EmptyText,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    /// Network failure, timeout, non-2xx without a usable body, or a body that
    /// does not match the expected schema.
    #[error("transport error: {0}")]
    Transport(String),
    /// Non-2xx response that carried a structured `{ "error": ... }` message.
    #[error("service error ({status}): {message}")]
    Service { status: u16, message: String },
    #[error("backend unavailable: {}", .0.advisory())]
    Unavailable(BackendHealth),
}

impl DetectError {
    /// Message shown to the user for a failed submission in `mode`.
    ///
    /// Service messages are surfaced verbatim; transport failures fall back to
    /// a generic per-mode message.
    pub fn user_message(&self, mode: DetectionMode) -> String {
        match (self, mode) {
            (DetectError::Validation(ValidationError::NoImageSelected), _) => {
                "Please select an image to upload.".to_string()
            }
            (DetectError::Validation(ValidationError::EmptyText), _) => {
                "Please enter some text for analysis.".to_string()
            }
            (DetectError::Service { message, .. }, _) => message.clone(),
            (DetectError::Transport(_), DetectionMode::ImageDetection) => {
                "Failed to process image. Please try again.".to_string()
            }
            (DetectError::Transport(_), DetectionMode::TextDetection) => {
                "Failed to analyze text. Please try again.".to_string()
            }
            (DetectError::Unavailable(health), _) => health.advisory().to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DetectError::Validation(_))
    }
}

impl From<reqwest::Error> for DetectError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            DetectError::Transport("request timed out".to_string())
        } else if e.is_connect() {
            DetectError::Transport(format!("connection failed: {}", e))
        } else if e.is_decode() {
            DetectError::Transport(format!("malformed response: {}", e))
        } else {
            DetectError::Transport(e.to_string())
        }
    }
}
