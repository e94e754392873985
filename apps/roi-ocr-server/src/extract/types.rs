//! Region extraction types
//!
//! Geometry of the region of interest and the errors raised while
//! producing it.

use std::path::Path;

use tempfile::TempPath;
use thiserror::Error;

/// Fractional bounds of the region of interest on the first page.
///
/// The rectangle covers the right-hand fifth of the page between 9% and 30%
/// of its height. It assumes a fixed document layout; pages laid out
/// differently yield the wrong region rather than an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoiBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl RoiBounds {
    pub const FIRST_PAGE_HEADER: RoiBounds = RoiBounds {
        left: 0.8,
        top: 0.09,
        right: 1.0,
        bottom: 0.3,
    };

    /// Convert to pixel coordinates for a rendered page.
    ///
    /// Coordinates are truncated toward zero; the right edge always lands on
    /// the page width.
    pub fn to_pixels(&self, page_width: u32, page_height: u32) -> PixelRect {
        let x0 = (self.left * page_width as f64) as u32;
        let y0 = (self.top * page_height as f64) as u32;
        let x1 = ((self.right * page_width as f64) as u32).min(page_width);
        let y1 = ((self.bottom * page_height as f64) as u32).min(page_height);

        PixelRect {
            x: x0,
            y: y0,
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
        }
    }
}

/// Pixel-based rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Cropped region persisted as a PNG file.
///
/// The file is removed when this value is dropped, so the artifact never
/// outlives the request that created it.
#[derive(Debug)]
pub struct CroppedRegion {
    path: TempPath,
    pub width: u32,
    pub height: u32,
}

impl CroppedRegion {
    pub(crate) fn new(path: TempPath, width: u32, height: u32) -> Self {
        Self {
            path,
            width,
            height,
        }
    }

    /// Location of the PNG artifact
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the encoded PNG bytes
    pub async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(self.path()).await
    }
}

/// Region extraction errors
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to open document: {0}")]
    Open(String),

    #[error("document has no pages")]
    NoPages,

    #[error("failed to render first page: {0}")]
    Render(String),

    #[error("failed to build page image: {0}")]
    Image(String),

    #[error("failed to write region image: {0}")]
    Io(#[from] std::io::Error),

    #[error("render task failed: {0}")]
    Task(String),
}
