use std::time::Duration;

pub mod backend;
pub mod config_file;
pub mod controller;
pub mod error;
pub mod health;
pub mod input;
pub mod media;
pub mod presenter;
pub mod session;

// Re-export for convenience
pub use backend::DetectionBackend;
pub use backend::http::HttpBackend;
pub use controller::{
    Applied, DetectionRequest, PreparedSubmission, ResultSlot, SubmissionController,
    SubmissionOutcome,
};
pub use error::{DetectError, ValidationError};
pub use health::{AdvisoryLevel, BackendHealth, HealthMonitor, HealthReport};
pub use input::InputPanel;
pub use media::{ImageFile, MediaAcquirer, MediaChange};
pub use presenter::{AI_GENERATED_MARKER, Category, ResultView};
pub use session::Session;

/// Default backend address used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5042";
/// Default cadence of the health probe.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Which kind of content the user is submitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionMode {
    #[default]
    ImageDetection,
    TextDetection,
}

impl DetectionMode {
    pub fn all() -> &'static [DetectionMode] {
        &[DetectionMode::ImageDetection, DetectionMode::TextDetection]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ImageDetection => "Image Detection",
            Self::TextDetection => "Text Detection",
        }
    }

    /// The other mode (used by the two-way segmented switch).
    pub fn toggled(self) -> Self {
        match self {
            Self::ImageDetection => Self::TextDetection,
            Self::TextDetection => Self::ImageDetection,
        }
    }
}

/// A verdict returned by the detection service.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    pub verdict: String,
    /// Probability of the verdict, in `[0, 1]`.
    pub confidence: f64,
}

/// A user-facing error message. Lives only long enough to raise a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

/// One-shot toast shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Runtime settings for a client session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base address of the detection service, without a trailing slash.
    pub base_url: String,
    pub poll_interval: Duration,
    /// Timeout for detection requests (model inference can be slow).
    pub request_timeout: Duration,
    /// Timeout for a single health probe. A timed-out probe counts as unreachable.
    pub health_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: Duration::from_secs(60),
            health_timeout: Duration::from_secs(4),
        }
    }
}

impl SessionConfig {
    /// Apply values from the on-disk config file over the defaults.
    pub fn from_file(file: &config_file::ConfigFile) -> Self {
        let mut config = Self::default();
        if let Some(server) = &file.server {
            if let Some(url) = &server.url {
                config.base_url = url.trim_end_matches('/').to_string();
            }
            if let Some(secs) = server.request_timeout_secs {
                config.request_timeout = Duration::from_secs(secs.max(1));
            }
            if let Some(secs) = server.health_timeout_secs {
                config.health_timeout = Duration::from_secs(secs.max(1));
            }
        }
        if let Some(secs) = file.polling.as_ref().and_then(|p| p.interval_secs) {
            config.poll_interval = Duration::from_secs(secs.max(1));
        }
        config
    }

    /// Apply `GENSCAN_URL`, `GENSCAN_POLL_SECS` and `GENSCAN_TIMEOUT` from the environment.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. Unparseable numbers are ignored.
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("GENSCAN_URL").filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(secs) = lookup("GENSCAN_POLL_SECS").and_then(|v| v.trim().parse::<u64>().ok()) {
            self.poll_interval = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = lookup("GENSCAN_TIMEOUT").and_then(|v| v.trim().parse::<u64>().ok()) {
            self.request_timeout = Duration::from_secs(secs.max(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_file::{ConfigFile, PollingConfig, ServerConfig};

    #[test]
    fn default_config_matches_service_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.base_url, "http://localhost:5042");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn from_file_overrides_and_strips_trailing_slash() {
        let file = ConfigFile {
            server: Some(ServerConfig {
                url: Some("http://10.0.0.2:9000/".to_string()),
                request_timeout_secs: Some(30),
                health_timeout_secs: None,
            }),
            polling: Some(PollingConfig {
                interval_secs: Some(0),
            }),
            ..Default::default()
        };
        let config = SessionConfig::from_file(&file);
        assert_eq!(config.base_url, "http://10.0.0.2:9000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.health_timeout, Duration::from_secs(4));
        // Zero would spin the poller; clamp to one second.
        assert_eq!(config.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn env_vars_override_file_values() {
        let mut config = SessionConfig::default();
        config.apply_vars(|key| match key {
            "GENSCAN_URL" => Some("http://detector:8080/".to_string()),
            "GENSCAN_POLL_SECS" => Some("10".to_string()),
            "GENSCAN_TIMEOUT" => Some("not a number".to_string()),
            _ => None,
        });
        assert_eq!(config.base_url, "http://detector:8080");
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn mode_toggle_round_trips() {
        assert_eq!(
            DetectionMode::ImageDetection.toggled(),
            DetectionMode::TextDetection
        );
        assert_eq!(
            DetectionMode::TextDetection.toggled().toggled(),
            DetectionMode::TextDetection
        );
        assert_eq!(DetectionMode::default(), DetectionMode::ImageDetection);
    }
}
