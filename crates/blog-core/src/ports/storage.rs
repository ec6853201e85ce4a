//! Image storage port.

use async_trait::async_trait;

/// An uploaded image as received from the client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-side file name, used only to pick an extension.
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Image store trait - persists uploads and hands back the stored file name.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store an image and return the name it is served under.
    async fn save(&self, upload: ImageUpload) -> Result<String, StorageError>;

    /// Remove a stored image by the name `save` returned. Missing files are
    /// not an error.
    async fn remove(&self, file_name: &str) -> Result<(), StorageError>;
}

/// Image storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Only image files are allowed (got {0})")]
    UnsupportedType(String),

    #[error("Image exceeds the {limit} byte upload limit")]
    TooLarge { limit: usize },

    #[error("Invalid stored image name: {0}")]
    InvalidName(String),

    #[error("Failed to store image: {0}")]
    Io(String),
}
