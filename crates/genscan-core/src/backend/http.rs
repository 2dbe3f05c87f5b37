//! reqwest-backed client for the detection service.

use std::time::Duration;

use reqwest::multipart::{Form, Part};

use super::{
    BackendFuture, DETECT_IMAGE_PATH, DETECT_TEXT_PATH, DetectionBackend, HEALTH_PATH,
    IMAGE_FIELD, TextRequest, error_from_body, parse_detection_body, parse_health_body,
};
use crate::error::DetectError;
use crate::health::HealthReport;
use crate::media::ImageFile;
use crate::{DetectionResult, SessionConfig};

/// Talks to a detection service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
    health_timeout: Duration,
}

impl HttpBackend {
    pub fn new(config: &SessionConfig) -> Result<Self, DetectError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DetectError::Transport(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self::with_client(client, config))
    }

    /// Build around an existing client (connection pool is shared).
    pub fn with_client(client: reqwest::Client, config: &SessionConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout,
            health_timeout: config.health_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch_health(&self) -> Result<HealthReport, DetectError> {
        let response = self
            .client
            .get(self.url(HEALTH_PATH))
            .timeout(self.health_timeout)
            .send()
            .await?;
        health_from_response(response).await
    }

    async fn post_image(&self, image: &ImageFile) -> Result<DetectionResult, DetectError> {
        tracing::debug!(
            file = image.name(),
            bytes = image.len(),
            mime = image.mime(),
            "submitting image"
        );
        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.name().to_string())
            .mime_str(image.mime())?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self
            .client
            .post(self.url(DETECT_IMAGE_PATH))
            .timeout(self.request_timeout)
            .multipart(form)
            .send()
            .await?;
        detection_from_response(response).await
    }

    async fn post_text(&self, text: &str) -> Result<DetectionResult, DetectError> {
        tracing::debug!(chars = text.chars().count(), "submitting text");
        let response = self
            .client
            .post(self.url(DETECT_TEXT_PATH))
            .timeout(self.request_timeout)
            .json(&TextRequest { text })
            .send()
            .await?;
        detection_from_response(response).await
    }
}

impl DetectionBackend for HttpBackend {
    fn name(&self) -> &str {
        &self.base_url
    }

    fn health(&self) -> BackendFuture<'_, HealthReport> {
        Box::pin(self.fetch_health())
    }

    fn detect_image<'a>(&'a self, image: &'a ImageFile) -> BackendFuture<'a, DetectionResult> {
        Box::pin(self.post_image(image))
    }

    fn detect_text<'a>(&'a self, text: &'a str) -> BackendFuture<'a, DetectionResult> {
        Box::pin(self.post_text(text))
    }
}

async fn read_response(response: reqwest::Response) -> Result<(u16, String), DetectError> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| DetectError::Transport(format!("failed to read response: {}", e)))?;
    Ok((status, body))
}

/// Map a detection endpoint response to a result or a typed error.
pub async fn detection_from_response(
    response: reqwest::Response,
) -> Result<DetectionResult, DetectError> {
    let (status, body) = read_response(response).await?;
    if !(200..300).contains(&status) {
        let err = error_from_body(status, &body);
        tracing::warn!(status, error = %err, "detection request failed");
        return Err(err);
    }
    parse_detection_body(&body)
}

/// Map a health endpoint response to a report. Any non-2xx status or an
/// unexpected body is an error, which the monitor classifies as Unreachable.
pub async fn health_from_response(
    response: reqwest::Response,
) -> Result<HealthReport, DetectError> {
    let (status, body) = read_response(response).await?;
    if !(200..300).contains(&status) {
        return Err(error_from_body(status, &body));
    }
    parse_health_body(&body)
}
