use std::{fmt, path::PathBuf, str::FromStr};

use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ───── Media kinds ──────────────────────────────────────────────────

/// Discriminates the two gallery collections. Each kind has its own table,
/// remote folder and defaults but shares the same record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
}

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "wmv", "flv", "webm"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

impl MediaKind {
    pub const ALL: [MediaKind; 2] = [MediaKind::Video, MediaKind::Image];

    pub fn table(self) -> &'static str {
        match self {
            MediaKind::Video => "videos",
            MediaKind::Image => "images",
        }
    }

    /// Resource type understood by the media host.
    pub fn resource_type(self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Image => "image",
        }
    }

    pub fn folder(self) -> &'static str {
        match self {
            MediaKind::Video => "portfolio_uploads",
            MediaKind::Image => "portfolio_images",
        }
    }

    pub fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            MediaKind::Video => VIDEO_EXTENSIONS,
            MediaKind::Image => IMAGE_EXTENSIONS,
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            MediaKind::Video => "Uploaded Video",
            MediaKind::Image => "Photo",
        }
    }

    pub fn default_category(self) -> &'static str {
        match self {
            MediaKind::Video => VideoCategory::default().as_str(),
            MediaKind::Image => "work",
        }
    }

    /// Lowercase noun used in user-facing messages.
    pub fn noun(self) -> &'static str {
        self.resource_type()
    }

    pub fn capitalized(self) -> &'static str {
        match self {
            MediaKind::Video => "Video",
            MediaKind::Image => "Image",
        }
    }

    /// Case-insensitive match on the text after the last `.`.
    pub fn accepts_file_name(self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => {
                let ext = ext.to_ascii_lowercase();
                self.allowed_extensions().contains(&ext.as_str())
            }
            _ => false,
        }
    }

    /// Videos are clamped to the closed category set; images take any non-blank value.
    pub fn resolve_category(self, raw: Option<&str>) -> String {
        let raw = raw.map(str::trim).filter(|value| !value.is_empty());
        match self {
            MediaKind::Video => raw
                .and_then(|value| value.parse::<VideoCategory>().ok())
                .unwrap_or_default()
                .as_str()
                .to_string(),
            MediaKind::Image => raw.unwrap_or(self.default_category()).to_string(),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCategory {
    #[default]
    Coding,
    Hairdressing,
}

impl VideoCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            VideoCategory::Coding => "coding",
            VideoCategory::Hairdressing => "hairdressing",
        }
    }
}

impl FromStr for VideoCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coding" => Ok(VideoCategory::Coding),
            "hairdressing" => Ok(VideoCategory::Hairdressing),
            _ => Err(()),
        }
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct MediaItem {
    pub id: i64,
    pub public_id: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMediaItem {
    pub public_id: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct Gallery {
    pub videos: Vec<MediaItem>,
    pub images: Vec<MediaItem>,
}

// ───── Input & Validation ───────────────────────────────────────────

/// Descriptive fields after defaults have been applied.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct MediaDetails {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,

    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 characters"))]
    pub category: String,
}

impl MediaDetails {
    pub fn resolve(
        kind: MediaKind,
        title: Option<&str>,
        description: Option<&str>,
        category: Option<&str>,
    ) -> Self {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(kind.default_title())
            .to_string();
        let description = description.map(str::trim).unwrap_or_default().to_string();

        MediaDetails {
            title,
            description,
            category: kind.resolve_category(category),
        }
    }

    pub fn into_new_item(self, public_id: String, url: String) -> NewMediaItem {
        NewMediaItem {
            public_id,
            url,
            title: self.title,
            description: self.description,
            category: self.category,
        }
    }
}

/// A file that has already been spooled to local disk by the multipart layer.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: Option<String>,
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub file: Option<UploadFile>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Browser upload form shared by the video and image endpoints.
#[derive(Debug, MultipartForm)]
pub struct MediaUploadForm {
    pub file: Option<TempFile>,
    pub title: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub category: Option<Text<String>>,
}

impl MediaUploadForm {
    /// Borrows the spooled temp file; the form must outlive the returned request.
    pub fn to_request(&self) -> UploadRequest {
        UploadRequest {
            file: self.file.as_ref().map(|temp| UploadFile {
                file_name: temp.file_name.clone(),
                path: temp.file.path().to_path_buf(),
                size: temp.size as u64,
            }),
            title: self.title.as_ref().map(|t| t.0.clone()),
            description: self.description.as_ref().map(|d| d.0.clone()),
            category: self.category.as_ref().map(|c| c.0.clone()),
        }
    }
}
