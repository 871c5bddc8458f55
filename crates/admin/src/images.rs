//! Menu image hosting.
//!
//! Images are stored under stable URLs that both binaries serve. The
//! [`ImageStore`] trait is the seam; [`LocalImageStore`] writes files into
//! `UPLOADS_DIR`, which both sites expose under `/uploads`.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use thiserror::Error;
use tracing::instrument;

/// Errors that can occur while storing or removing images.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The upload is not an image.
    #[error("unsupported content type: {0}")]
    UnsupportedType(String),

    /// The upload exceeds the configured size cap.
    #[error("image is larger than {max_bytes} bytes")]
    TooLarge { max_bytes: usize },

    /// The upload has no bytes.
    #[error("image is empty")]
    Empty,

    /// Filesystem operation failed.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stores menu images and hands back the URL they are served from.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `bytes` and return a stable URL.
    ///
    /// `filename_hint` is the client's filename; it only shapes the stored
    /// name.
    async fn upload(&self, bytes: &[u8], filename_hint: &str) -> Result<String, ImageError>;

    /// Remove the image behind `url`. URLs this store did not issue are
    /// ignored.
    async fn delete(&self, url: &str) -> Result<(), ImageError>;
}

/// Whether a multipart content type is acceptable for menu images.
#[must_use]
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().to_ascii_lowercase().starts_with("image/"))
}

/// Filesystem-backed image store.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    dir: PathBuf,
    url_prefix: String,
}

impl LocalImageStore {
    /// Create a store writing into `dir` and issuing URLs under `url_prefix`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The on-disk path for a URL this store issued.
    fn path_for(&self, url: &str) -> Option<PathBuf> {
        let name = url.strip_prefix(&self.url_prefix)?.strip_prefix('/')?;
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }
        Some(self.dir.join(name))
    }
}

/// `<unix-millis>-<hint with whitespace replaced by _>`.
///
/// Path separators are dropped so the name cannot leave the upload dir.
fn stored_name(millis: u128, hint: &str) -> String {
    let base = hint.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        format!("{millis}-image")
    } else {
        format!("{millis}-{cleaned}")
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(&self, bytes: &[u8], filename_hint: &str) -> Result<String, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let name = stored_name(millis, filename_hint);

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&name), bytes).await?;

        let url = format!("{}/{name}", self.url_prefix);
        tracing::info!(%url, "image stored");
        Ok(url)
    }

    #[instrument(skip(self))]
    async fn delete(&self, url: &str) -> Result<(), ImageError> {
        let Some(path) = self.path_for(url) else {
            tracing::debug!("not a hosted image, nothing to delete");
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!("image deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_name_replaces_whitespace() {
        assert_eq!(
            stored_name(1_700_000_000_000, "butter chicken.jpg"),
            "1700000000000-butter_chicken.jpg"
        );
        assert_eq!(stored_name(5, "a\tb c.png"), "5-a_b_c.png");
    }

    #[test]
    fn test_stored_name_strips_paths() {
        assert_eq!(stored_name(5, "../../etc/passwd"), "5-passwd");
        assert_eq!(stored_name(5, "C:\\photos\\dal.webp"), "5-dal.webp");
        assert_eq!(stored_name(5, ".hidden"), "5-hidden");
        assert_eq!(stored_name(5, "   "), "5-image");
    }

    #[test]
    fn test_is_image_content_type() {
        assert!(is_image_content_type("image/png"));
        assert!(is_image_content_type("IMAGE/JPEG; charset=binary"));
        assert!(!is_image_content_type("text/html"));
        assert!(!is_image_content_type("application/octet-stream"));
    }

    #[tokio::test]
    async fn test_upload_then_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path(), "/uploads/");

        let url = store.upload(b"\x89PNG", "samosa plate.png").await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("-samosa_plate.png"));

        let path = store.path_for(&url).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG");

        store.delete(&url).await.unwrap();
        assert!(!path.exists());

        // Deleting twice is fine
        store.delete(&url).await.unwrap();
    }

    #[tokio::test]
    async fn test_upload_rejects_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path(), "/uploads");
        assert!(matches!(
            store.upload(b"", "empty.png").await,
            Err(ImageError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_delete_ignores_foreign_urls() {
        let dir = tempfile::tempdir().unwrap();
        let keep = dir.path().join("keep.png");
        std::fs::write(&keep, b"x").unwrap();
        let store = LocalImageStore::new(dir.path(), "/uploads");

        store
            .delete("https://cdn.example.com/uploads/keep.png")
            .await
            .unwrap();
        store.delete("/uploads/../keep.png").await.unwrap();
        store.delete("/static/keep.png").await.unwrap();
        assert!(keep.exists());
    }
}
