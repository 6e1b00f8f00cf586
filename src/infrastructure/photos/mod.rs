//! Photo evidence storage
//!
//! The core treats photo storage as a port: hand in bytes plus a content
//! type, get back a URL the caller can resolve. URLs come in two valid
//! forms, absolute (externally hosted) or root-relative (served by the API
//! host); [`LocalPhotoStore`] produces the latter.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Hard cap on a single uploaded photo.
pub const MAX_PHOTO_BYTES: usize = 8 * 1024 * 1024;

/// Root-relative prefix under which locally stored photos are served.
pub const PUBLIC_PHOTO_PREFIX: &str = "/uploads/checks";

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("only image uploads are accepted (got {0})")]
    UnsupportedContentType(String),
    #[error("photo exceeds the {MAX_PHOTO_BYTES} byte limit")]
    TooLarge,
    #[error("photo storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Store bytes, get back a durable URL.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    async fn store(&self, bytes: &[u8], content_type: &str) -> Result<String, PhotoError>;
}

/// Filesystem-backed store serving files under a public prefix.
pub struct LocalPhotoStore {
    root: PathBuf,
    public_prefix: String,
}

impl LocalPhotoStore {
    pub fn new(root: PathBuf, public_prefix: impl Into<String>) -> Self {
        Self {
            root,
            public_prefix: public_prefix.into(),
        }
    }

    fn extension_for(content_type: &str) -> &'static str {
        match content_type {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "img",
        }
    }
}

#[async_trait]
impl PhotoStore for LocalPhotoStore {
    async fn store(&self, bytes: &[u8], content_type: &str) -> Result<String, PhotoError> {
        if !content_type.starts_with("image/") {
            return Err(PhotoError::UnsupportedContentType(content_type.to_string()));
        }
        if bytes.len() > MAX_PHOTO_BYTES {
            return Err(PhotoError::TooLarge);
        }

        tokio::fs::create_dir_all(&self.root).await?;
        let filename = format!("{}.{}", Uuid::new_v4(), Self::extension_for(content_type));
        tokio::fs::write(self.root.join(&filename), bytes).await?;

        Ok(format!("{}/{}", self.public_prefix, filename))
    }
}
