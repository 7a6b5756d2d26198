//! Uploaded image storage
//!
//! Images are accepted by content, not by the client's declared type, and
//! stored under a random name so user input never reaches the filesystem.

use crate::{WebError, WebResult};
use axum::extract::Multipart;
use rand::{distributions::Alphanumeric, Rng};
use recipebook_core::{validation_error, UploadConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const RANDOM_NAME_LEN: usize = 16;
const UPLOAD_FIELD: &str = "file";

/// Detect a supported image format from its leading bytes
pub fn sniff_image(bytes: &[u8]) -> Option<&'static str> {
    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];

    if bytes.starts_with(PNG) {
        Some("png")
    } else if bytes.starts_with(JPEG) {
        Some("jpg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("gif")
    } else {
        None
    }
}

/// A stored name is a single path component without traversal
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
        && !name.contains('\0')
}

fn random_name(ext: &str) -> String {
    let stem: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_NAME_LEN)
        .map(char::from)
        .collect();
    format!("{}.{}", stem, ext)
}

/// Directory of uploaded images
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
    max_mb: usize,
}

impl UploadStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            max_bytes: config.max_file_size_bytes(),
            max_mb: config.max_file_size_mb,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> WebResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Validate and store raw image bytes, returning the stored file name
    pub async fn save(&self, bytes: &[u8]) -> WebResult<String> {
        if bytes.len() > self.max_bytes {
            return Err(WebError::PayloadTooLarge {
                limit_mb: self.max_mb,
            });
        }

        let ext = sniff_image(bytes).ok_or_else(|| {
            validation_error!("Only png, jpg and gif images are allowed", "file", "uploads")
        })?;

        let name = random_name(ext);
        let path = self.dir.join(&name);
        tokio::fs::write(&path, bytes).await?;

        info!("Saved upload {} ({} bytes)", name, bytes.len());
        Ok(name)
    }

    /// Read the `file` field of a multipart body and store it
    pub async fn save_from_multipart(&self, mut multipart: Multipart) -> WebResult<String> {
        while let Some(field) = multipart.next_field().await? {
            if field.name() != Some(UPLOAD_FIELD) {
                debug!("Skipping multipart field {:?}", field.name());
                continue;
            }
            let bytes = field.bytes().await?;
            return self.save(&bytes).await;
        }

        Err(validation_error!("Missing file field", UPLOAD_FIELD, "uploads").into())
    }

    /// Path of a stored file, rejecting names that could escape the directory
    pub fn resolve(&self, name: &str) -> WebResult<PathBuf> {
        if !is_safe_name(name) {
            return Err(validation_error!("Invalid file name", "filename", "uploads").into());
        }
        Ok(self.dir.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipebook_core::RecipeBookError;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn store(dir: &Path, max_mb: usize) -> UploadStore {
        UploadStore::new(&UploadConfig {
            dir: dir.to_path_buf(),
            max_file_size_mb: max_mb,
        })
    }

    #[test]
    fn test_sniffing() {
        assert_eq!(sniff_image(PNG_HEADER), Some("png"));
        assert_eq!(sniff_image(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10]), Some("jpg"));
        assert_eq!(sniff_image(b"GIF89a\x01\x00"), Some("gif"));
        assert_eq!(sniff_image(b"%PDF-1.7"), None);
        assert_eq!(sniff_image(b""), None);
    }

    #[test]
    fn test_safe_names() {
        assert!(is_safe_name("AbC123xyz0987654.png"));
        assert!(!is_safe_name("../etc/passwd"));
        assert!(!is_safe_name("a/b.png"));
        assert!(!is_safe_name("a\\b.png"));
        assert!(!is_safe_name(""));
    }

    #[test]
    fn test_random_name_shape() {
        let name = random_name("gif");
        let (stem, ext) = name.split_once('.').unwrap();
        assert_eq!(stem.len(), RANDOM_NAME_LEN);
        assert!(stem.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(ext, "gif");
    }

    #[tokio::test]
    async fn test_save_writes_sniffed_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), 1);

        let name = store.save(PNG_HEADER).await.unwrap();
        assert!(name.ends_with(".png"));
        assert_eq!(std::fs::read(dir.path().join(&name)).unwrap(), PNG_HEADER);
    }

    #[tokio::test]
    async fn test_save_rejects_other_types_and_oversize() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), 1);

        let err = store.save(b"plain text").await.unwrap_err();
        assert!(matches!(
            err,
            WebError::Core(RecipeBookError::Validation { .. })
        ));

        let mut big = PNG_HEADER.to_vec();
        big.resize(1024 * 1024 + 1, 0);
        assert!(matches!(
            store.save(&big).await.unwrap_err(),
            WebError::PayloadTooLarge { .. }
        ));
    }
}
