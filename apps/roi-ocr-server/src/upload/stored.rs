//! Request-scoped storage of uploaded files
//!
//! Uploads are written under the upload directory with a generated name;
//! the client-supplied filename is only kept as metadata. The file is
//! removed when the [`StoredUpload`] is dropped, whichever way the request
//! ends.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// An uploaded file persisted for the lifetime of one request
#[derive(Debug)]
pub struct StoredUpload {
    id: Uuid,
    path: PathBuf,
    original_name: String,
}

impl StoredUpload {
    /// Write `data` to `<dir>/<uuid>.pdf`
    pub async fn save(dir: &Path, original_name: &str, data: &[u8]) -> std::io::Result<Self> {
        let id = Uuid::new_v4();
        // Guard exists before the write so a partial file is cleaned up too
        let stored = Self {
            id,
            path: dir.join(format!("{}.pdf", id)),
            original_name: original_name.to_string(),
        };

        tokio::fs::write(&stored.path, data).await?;

        tracing::debug!(
            upload_id = %stored.id,
            file_name = %stored.original_name,
            bytes = data.len(),
            "Stored upload"
        );

        Ok(stored)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }
}

impl Drop for StoredUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(upload_id = %self.id, "Removed stored upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                upload_id = %self.id,
                path = %self.path.display(),
                "Failed to remove stored upload: {}",
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_uses_opaque_name() {
        let dir = tempfile::tempdir().unwrap();
        let stored = StoredUpload::save(dir.path(), "../../etc/passwd.pdf", b"%PDF")
            .await
            .unwrap();

        assert_eq!(stored.path().parent(), Some(dir.path()));
        assert_eq!(
            stored.path().file_name().unwrap().to_string_lossy(),
            format!("{}.pdf", stored.id())
        );
        assert_eq!(stored.original_name(), "../../etc/passwd.pdf");
        assert_eq!(std::fs::read(stored.path()).unwrap(), b"%PDF");
    }

    #[tokio::test]
    async fn test_file_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let stored = StoredUpload::save(dir.path(), "a.pdf", b"data").await.unwrap();
        let path = stored.path().to_path_buf();
        assert!(path.exists());

        drop(stored);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_same_client_name_does_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let first = StoredUpload::save(dir.path(), "same.pdf", b"one").await.unwrap();
        let second = StoredUpload::save(dir.path(), "same.pdf", b"two").await.unwrap();

        assert_ne!(first.path(), second.path());
        assert_eq!(std::fs::read(first.path()).unwrap(), b"one");
        assert_eq!(std::fs::read(second.path()).unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = StoredUpload::save(&dir.path().join("missing"), "a.pdf", b"x").await;
        assert!(result.is_err());
    }
}
