//! Upload types

use thiserror::Error;

/// Extensions accepted by the upload endpoint (compared case-insensitively)
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf"];

/// Reasons an upload is rejected before any processing happens
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("No file part")]
    MissingFilePart,

    #[error("No selected file")]
    NoSelectedFile,

    #[error("Invalid file format")]
    InvalidFormat,

    #[error("{0}")]
    Malformed(String),
}

/// Check the client-supplied filename against [`ALLOWED_EXTENSIONS`].
///
/// The extension is whatever follows the last `.`; names without a dot are
/// rejected.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}
