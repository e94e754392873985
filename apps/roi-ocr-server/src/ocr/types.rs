//! OCR Types
//!
//! Annotations returned by a text detector and the errors raised while
//! talking to it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A single detected text fragment.
///
/// Detectors return these in their own order; for Cloud Vision the first
/// annotation holds the full detected text and the rest are per-token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnnotation {
    /// Recognized text
    pub description: String,
    /// Detected language, when the service reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl TextAnnotation {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            locale: None,
        }
    }
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for OcrError {
    fn from(err: reqwest::Error) -> Self {
        OcrError::Http(err.to_string())
    }
}
