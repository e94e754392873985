//! Region Extractor
//!
//! Rasterizes the first page of a PDF and crops a fixed fractional
//! rectangle from it, producing a transient PNG artifact.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use roi_ocr_server::extract::extract_region;
//!
//! let region = extract_region(&pdf_path, &upload_dir).await?;
//! let png = region.read_bytes().await?;
//! // the PNG is removed when `region` is dropped
//! ```

mod renderer;
mod types;

pub use renderer::{crop_region, extract_region, extract_region_blocking, render_first_page};
pub use types::{CroppedRegion, ExtractError, PixelRect, RoiBounds};
