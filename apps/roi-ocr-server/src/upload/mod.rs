//! Upload Module
//!
//! Validation of incoming files and their request-scoped storage.

pub mod stored;
pub mod types;

pub use stored::StoredUpload;
pub use types::{allowed_file, UploadRejection, ALLOWED_EXTENSIONS};
