//! ROI OCR Server Library
//!
//! Extracts labelled header fields from uploaded PDFs: the first page is
//! rasterized, a fixed region is cropped and sent to Google Cloud Vision,
//! and the recognized text is mapped onto an ordered list of patterns.
//!
//! # Modules
//!
//! - `extract`: first-page rendering and region cropping via MuPDF
//! - `ocr`: text detection capability and the Cloud Vision client
//! - `mapper`: pattern artifact loading and text-to-field mapping
//! - `upload`: upload validation and request-scoped storage
//! - `routes`: HTTP surface

pub mod config;
pub mod error;
pub mod extract;
pub mod mapper;
pub mod ocr;
pub mod routes;
pub mod state;
pub mod upload;

#[cfg(test)]
mod test_support;
