//! OCR Service
//!
//! Wraps a text detector behind a single `recognize` call that turns the
//! detector's annotations into one raw text string.

use std::sync::Arc;
use std::time::Duration;

use super::{
    provider::TextDetector,
    types::{OcrError, TextAnnotation},
};

/// OCR client adapter
#[derive(Clone)]
pub struct OcrClient {
    detector: Arc<dyn TextDetector>,
    timeout: Option<Duration>,
}

impl OcrClient {
    pub fn new(detector: Arc<dyn TextDetector>, timeout: Option<Duration>) -> Self {
        Self { detector, timeout }
    }

    pub fn provider_name(&self) -> &'static str {
        self.detector.name()
    }

    /// Submit image bytes and return every annotation's description joined
    /// by newlines.
    ///
    /// No annotations yields an empty string. A single failed or timed out
    /// call fails the whole recognition; there is no retry.
    pub async fn recognize(&self, image_data: &[u8]) -> Result<String, OcrError> {
        let detection = self.detector.detect_text(image_data);

        let annotations = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, detection)
                .await
                .map_err(|_| OcrError::Timeout(limit))??,
            None => detection.await?,
        };

        tracing::debug!(
            provider = self.detector.name(),
            annotations = annotations.len(),
            "Text detection complete"
        );

        Ok(join_annotations(&annotations))
    }
}

/// Concatenate annotation descriptions in order, separated by `\n`
pub fn join_annotations(annotations: &[TextAnnotation]) -> String {
    annotations
        .iter()
        .map(|annotation| annotation.description.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
