//! Local-disk image store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use blog_core::ports::{ImageStore, ImageUpload, StorageError};

const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Upload settings.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory images are written to and served from.
    pub dir: PathBuf,
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Writes uploads to `UploadConfig::dir` under generated names.
pub struct LocalImageStore {
    config: UploadConfig,
}

impl LocalImageStore {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// Pick the stored extension from the client file name, falling back to
    /// the content type.
    fn extension(upload: &ImageUpload) -> Result<&'static str, StorageError> {
        let from_name = upload
            .file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let candidate = match from_name {
            Some(ext) => ext,
            None => match upload.content_type.as_deref() {
                Some(ct) => ct
                    .strip_prefix("image/")
                    .map(str::to_string)
                    .unwrap_or_default(),
                None => String::new(),
            },
        };

        ALLOWED_EXTENSIONS
            .into_iter()
            .find(|allowed| *allowed == candidate)
            .ok_or_else(|| {
                let described = upload
                    .file_name
                    .clone()
                    .or_else(|| upload.content_type.clone())
                    .unwrap_or_else(|| "unknown file".to_string());
                StorageError::UnsupportedType(described)
            })
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, upload: ImageUpload) -> Result<String, StorageError> {
        if upload.bytes.len() > self.config.max_bytes {
            return Err(StorageError::TooLarge {
                limit: self.config.max_bytes,
            });
        }
        let extension = Self::extension(&upload)?;

        tokio::fs::create_dir_all(&self.config.dir)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        let file_name = format!(
            "image-{}-{}.{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            extension
        );
        let path = self.config.dir.join(&file_name);

        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        tracing::info!(file = %file_name, bytes = upload.bytes.len(), "Image stored");
        Ok(file_name)
    }

    async fn remove(&self, file_name: &str) -> Result<(), StorageError> {
        // Only bare names produced by `save` resolve inside the upload dir.
        let is_bare = Path::new(file_name).file_name().and_then(|n| n.to_str()) == Some(file_name);
        if !is_bare || file_name.starts_with('.') {
            return Err(StorageError::InvalidName(file_name.to_string()));
        }

        match tokio::fs::remove_file(self.config.dir.join(file_name)).await {
            Ok(()) => {
                tracing::info!(file = %file_name, "Image removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> LocalImageStore {
        LocalImageStore::new(UploadConfig {
            dir: dir.join("uploads"),
            max_bytes: 16,
        })
    }

    fn upload(file_name: Option<&str>, content_type: Option<&str>, len: usize) -> ImageUpload {
        ImageUpload {
            file_name: file_name.map(String::from),
            content_type: content_type.map(String::from),
            bytes: vec![7; len],
        }
    }

    #[tokio::test]
    async fn test_save_writes_file_with_generated_name() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        let name = store
            .save(upload(Some("Scam Screenshot.PNG"), Some("image/png"), 4))
            .await
            .unwrap();

        assert!(name.starts_with("image-"));
        assert!(name.ends_with(".png"));
        let written = tokio::fs::read(store.dir().join(&name)).await.unwrap();
        assert_eq!(written, vec![7; 4]);
    }

    #[tokio::test]
    async fn test_extension_from_content_type() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        let name = store.save(upload(None, Some("image/webp"), 1)).await.unwrap();

        assert!(name.ends_with(".webp"));
    }

    #[tokio::test]
    async fn test_rejects_non_images() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        let result = store
            .save(upload(Some("payload.exe"), Some("application/octet-stream"), 1))
            .await;

        assert!(matches!(result, Err(StorageError::UnsupportedType(_))));
    }

    #[tokio::test]
    async fn test_rejects_oversized_upload() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        let result = store.save(upload(Some("big.jpg"), None, 17)).await;

        assert!(matches!(result, Err(StorageError::TooLarge { limit: 16 })));
        assert!(!store.dir().exists());
    }

    #[tokio::test]
    async fn test_remove_deletes_stored_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        let name = store.save(upload(Some("scam.gif"), None, 2)).await.unwrap();

        store.remove(&name).await.unwrap();

        assert!(!store.dir().join(&name).exists());
        // Already gone is fine.
        store.remove(&name).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_rejects_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        for name in ["../secret.png", "nested/image.png", "..", ""] {
            let result = store.remove(name).await;
            assert!(
                matches!(result, Err(StorageError::InvalidName(_))),
                "{name:?} accepted"
            );
        }
    }
}
