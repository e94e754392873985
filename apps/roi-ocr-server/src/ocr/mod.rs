//! OCR Module
//!
//! Sends the cropped region to an external text-detection service and
//! returns the raw detected text.
//!
//! The production backend is Google Cloud Vision (`TEXT_DETECTION`);
//! anything implementing [`TextDetector`] can be injected instead.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use roi_ocr_server::ocr::{OcrClient, VisionDetector};
//!
//! let detector = VisionDetector::from_config(&config.ocr)?;
//! let client = OcrClient::new(Arc::new(detector), config.ocr.timeout);
//! let text = client.recognize(&png_bytes).await?;
//! ```

mod credentials;
mod provider;
mod service;
mod types;

pub use credentials::Credentials;
pub use provider::{TextDetector, VisionDetector};
pub use service::{join_annotations, OcrClient};
pub use types::{OcrError, TextAnnotation};

#[cfg(test)]
pub use provider::MockDetector;
