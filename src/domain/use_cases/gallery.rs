use std::sync::Arc;

use validator::Validate;

use crate::{
    entities::{
        flash::FlashMessage,
        media::{Gallery, MediaDetails, MediaItem, MediaKind, UploadRequest},
    },
    errors::{AppError, MediaError},
    infrastructure::media::{MediaHost, MediaUpload},
    repositories::media::MediaRepository,
};

/// Result of a delete that reached the local store.
#[derive(Debug)]
pub struct DeleteReport {
    pub item: MediaItem,
    /// Set when the remote binary could not be removed; the local row is gone regardless.
    pub remote_error: Option<MediaError>,
}

pub struct GalleryHandler {
    pub media_repo: Arc<dyn MediaRepository>,
    pub media_host: Option<Arc<dyn MediaHost>>,
    pub debug: bool,
}

impl GalleryHandler {
    pub fn new(
        media_repo: Arc<dyn MediaRepository>,
        media_host: Option<Arc<dyn MediaHost>>,
        debug: bool,
    ) -> Self {
        GalleryHandler { media_repo, media_host, debug }
    }

    pub fn uploads_enabled(&self) -> bool {
        self.media_host.is_some()
    }

    /// Both collections, each ordered newest first.
    pub async fn list(&self) -> Result<Gallery, AppError> {
        let videos = self.media_repo.list(MediaKind::Video).await?;
        let images = self.media_repo.list(MediaKind::Image).await?;

        Ok(Gallery { videos, images })
    }

    /// Validates the file, pushes it to the media host and records it.
    /// Nothing is stored locally unless the remote upload succeeded.
    pub async fn upload(&self, kind: MediaKind, request: UploadRequest) -> Result<MediaItem, AppError> {
        let file = request
            .file
            .filter(|file| file.file_name.as_deref().is_some_and(|name| !name.trim().is_empty()))
            .ok_or_else(|| AppError::InvalidInput("No file selected".to_string()))?;
        let file_name = file.file_name.unwrap_or_default();

        if !kind.accepts_file_name(&file_name) {
            return Err(AppError::InvalidInput(format!(
                "Invalid file type. Please upload {} {} file.",
                if kind == MediaKind::Image { "an" } else { "a" },
                kind
            )));
        }

        let media_host = self.media_host.as_ref().ok_or(AppError::MediaNotConfigured)?;

        let details = MediaDetails::resolve(
            kind,
            request.title.as_deref(),
            request.description.as_deref(),
            request.category.as_deref(),
        );
        details.validate()?;

        let upload = MediaUpload::new(kind, file.path, file_name, file.size);
        let uploaded = media_host.upload(&upload).await.map_err(|e| {
            tracing::error!(kind = %kind, "Media upload failed: {}", e);
            AppError::Media(e)
        })?;

        let new_item = details.into_new_item(uploaded.public_id, uploaded.secure_url);
        let item = self.media_repo.insert(kind, &new_item).await.map_err(|e| {
            tracing::error!(
                kind = %kind,
                public_id = %new_item.public_id,
                "Failed to save media metadata: {}", e
            );
            e
        })?;

        tracing::info!(kind = %kind, id = item.id, public_id = %item.public_id, "Media uploaded");
        Ok(item)
    }

    /// Removes a record. The remote binary is deleted on a best-effort basis
    /// first; the local row is removed whatever the remote outcome.
    pub async fn delete(&self, kind: MediaKind, raw_id: &str) -> Result<DeleteReport, AppError> {
        let id = raw_id
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid {} id.", kind)))?;

        let item = self
            .media_repo
            .find_by_id(kind, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} not found.", kind.capitalized())))?;

        let remote_error = match &self.media_host {
            Some(host) => host
                .destroy(&item.public_id, kind.resource_type())
                .await
                .err()
                .inspect(|e| {
                    tracing::warn!(
                        kind = %kind,
                        public_id = %item.public_id,
                        "Remote media delete failed, removing local record anyway: {}", e
                    )
                }),
            None => {
                tracing::warn!(kind = %kind, "Media host not configured; remote asset left in place");
                None
            }
        };

        if !self.media_repo.delete(kind, id).await? {
            // Removed concurrently between lookup and delete.
            return Err(AppError::NotFound(format!("{} not found.", kind.capitalized())));
        }

        tracing::info!(kind = %kind, id, "Media deleted");
        Ok(DeleteReport { item, remote_error })
    }

    pub fn upload_success_message(&self, kind: MediaKind) -> FlashMessage {
        FlashMessage::success(format!("{} uploaded successfully!", kind.capitalized()))
    }

    /// Maps an upload failure to the message shown to the visitor.
    /// Diagnostic detail is appended only in debug mode.
    pub fn upload_failure_message(&self, kind: MediaKind, error: &AppError) -> FlashMessage {
        match error {
            AppError::InvalidInput(msg) => FlashMessage::error(msg.clone()),
            AppError::MediaNotConfigured => FlashMessage::error("Media uploads are not configured."),
            AppError::PayloadTooLarge(msg) => FlashMessage::error(msg.clone()),
            AppError::Conflict(detail) => {
                FlashMessage::error(self.with_detail(format!("This {} already exists.", kind), detail))
            }
            AppError::Database(detail) => FlashMessage::error(self.with_detail(
                format!("Database error while saving {} metadata.", kind),
                detail,
            )),
            other => FlashMessage::error(self.with_detail(
                format!("Error uploading {}. Please try again.", kind),
                &other.to_string(),
            )),
        }
    }

    pub fn delete_messages(&self, kind: MediaKind, outcome: &Result<DeleteReport, AppError>) -> Vec<FlashMessage> {
        match outcome {
            Ok(report) => {
                let mut messages = vec![FlashMessage::success(format!("{} deleted.", kind.capitalized()))];
                if self.debug {
                    if let Some(e) = &report.remote_error {
                        messages.push(FlashMessage::warning(format!(
                            "Remote media could not be deleted: {}",
                            e
                        )));
                    }
                }
                messages
            }
            Err(AppError::InvalidInput(msg)) | Err(AppError::NotFound(msg)) => {
                vec![FlashMessage::error(msg.clone())]
            }
            Err(other) => vec![FlashMessage::error(self.with_detail(
                format!("Database error while deleting {}.", kind),
                &other.to_string(),
            ))],
        }
    }

    fn with_detail(&self, message: String, detail: &str) -> String {
        if self.debug {
            format!("{} ({})", message, detail)
        } else {
            message
        }
    }
}
