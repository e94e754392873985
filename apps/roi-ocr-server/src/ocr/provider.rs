//! OCR Providers
//!
//! Defines the text detector trait and the Google Cloud Vision
//! implementation.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Deserialize;

use super::credentials::Credentials;
use super::types::{OcrError, TextAnnotation};
use crate::config::{ConfigError, OcrConfig};

/// External text-detection capability
#[async_trait]
pub trait TextDetector: Send + Sync {
    /// Short provider name used in logs
    fn name(&self) -> &'static str;

    /// Submit encoded image bytes and return the detected annotations in the
    /// provider's order
    async fn detect_text(&self, image_data: &[u8]) -> Result<Vec<TextAnnotation>, OcrError>;
}

/// Google Cloud Vision `TEXT_DETECTION` provider
pub struct VisionDetector {
    client: reqwest::Client,
    /// Base URL, e.g. `https://vision.googleapis.com`
    endpoint: String,
    credentials: Credentials,
}

impl VisionDetector {
    pub fn new(endpoint: &str, credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Load credentials from the configured path and build the detector
    pub fn from_config(config: &OcrConfig) -> Result<Self, ConfigError> {
        let credentials = Credentials::load(&config.credentials_path)?;
        tracing::info!(
            path = %config.credentials_path.display(),
            credentials = ?credentials,
            "Loaded Vision credentials"
        );
        Ok(Self::new(&config.endpoint, credentials))
    }

    fn annotate_url(&self) -> String {
        format!("{}/v1/images:annotate", self.endpoint)
    }
}

#[async_trait]
impl TextDetector for VisionDetector {
    fn name(&self) -> &'static str {
        "google-vision"
    }

    async fn detect_text(&self, image_data: &[u8]) -> Result<Vec<TextAnnotation>, OcrError> {
        let request = serde_json::json!({
            "requests": [
                {
                    "image": { "content": BASE64.encode(image_data) },
                    "features": [ { "type": "TEXT_DETECTION" } ]
                }
            ]
        });

        let builder = self.client.post(self.annotate_url()).json(&request);
        let response = self
            .credentials
            .authorize(&self.client, builder)
            .await?
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(OcrError::ApiError(format!(
                "Vision returned {}: {}",
                status,
                extract_vision_error(&body).unwrap_or(body)
            )));
        }

        parse_annotate_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    error: Option<VisionStatus>,
}

#[derive(Debug, Deserialize)]
struct VisionStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl VisionStatus {
    fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.message.trim().is_empty() {
            parts.push(self.message.clone());
        }
        if let Some(status) = self.status.as_ref().filter(|s| !s.trim().is_empty()) {
            parts.push(format!("status: {}", status));
        }
        if self.code != 0 {
            parts.push(format!("code: {}", self.code));
        }
        if parts.is_empty() {
            "unknown error".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

/// Parse a successful `images:annotate` body.
///
/// A missing annotation list means no text was found and is not an error; a
/// per-image error object is.
fn parse_annotate_response(body: &str) -> Result<Vec<TextAnnotation>, OcrError> {
    let parsed: AnnotateResponse = serde_json::from_str(body)
        .map_err(|e| OcrError::InvalidResponse(format!("failed to parse Vision response: {}", e)))?;

    let Some(first) = parsed.responses.into_iter().next() else {
        return Ok(Vec::new());
    };

    if let Some(error) = first.error {
        return Err(OcrError::ApiError(error.describe()));
    }

    Ok(first.text_annotations)
}

fn extract_vision_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<VisionStatus>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed.error.map(|error| error.describe())
}

/// Mock detector for testing
#[cfg(test)]
pub struct MockDetector {
    pub response: Result<Vec<TextAnnotation>, String>,
    pub delay: Option<std::time::Duration>,
}

#[cfg(test)]
impl MockDetector {
    pub fn returning(texts: &[&str]) -> Self {
        Self {
            response: Ok(texts.iter().map(|t| TextAnnotation::new(*t)).collect()),
            delay: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            delay: None,
        }
    }
}

#[cfg(test)]
#[async_trait]
impl TextDetector for MockDetector {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn detect_text(&self, _image_data: &[u8]) -> Result<Vec<TextAnnotation>, OcrError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone().map_err(OcrError::ApiError)
    }
}
