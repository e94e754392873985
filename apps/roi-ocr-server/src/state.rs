//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::mapper::PatternSet;
use crate::ocr::OcrClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    patterns: PatternSet,
    ocr: OcrClient,
}

impl AppState {
    /// Create a new application state
    ///
    /// Everything here is read-only after startup; handlers share it by
    /// cloning the `Arc`.
    pub fn new(config: Config, patterns: PatternSet, ocr: OcrClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                patterns,
                ocr,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the compiled field patterns
    pub fn patterns(&self) -> &PatternSet {
        &self.inner.patterns
    }

    /// Get the OCR client
    pub fn ocr(&self) -> &OcrClient {
        &self.inner.ocr
    }
}
