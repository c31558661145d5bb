use std::path::PathBuf;

use async_trait::async_trait;

use crate::{entities::media::MediaKind, errors::MediaError};

pub mod cloudinary;

/// Everything the host needs to store one spooled file.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaUpload {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
    pub resource_type: &'static str,
    pub folder: &'static str,
    pub use_filename: bool,
    pub unique_filename: bool,
}

impl MediaUpload {
    pub fn new(kind: MediaKind, path: PathBuf, file_name: String, size: u64) -> Self {
        MediaUpload {
            path,
            file_name,
            size,
            resource_type: kind.resource_type(),
            folder: kind.folder(),
            use_filename: true,
            unique_filename: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub secure_url: String,
    pub public_id: String,
}

/// Remote store that owns the media binaries. Local rows only reference them.
#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(&self, upload: &MediaUpload) -> Result<UploadedMedia, MediaError>;
    async fn destroy(&self, public_id: &str, resource_type: &str) -> Result<(), MediaError>;
}
