//! Domain models for uploaded files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Purpose tag for an uploaded file record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadedFileKind {
    Attachment,
}

impl UploadedFileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadedFileKind::Attachment => "attachment",
        }
    }
}

impl std::str::FromStr for UploadedFileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attachment" => Ok(UploadedFileKind::Attachment),
            other => Err(format!("unknown uploaded file kind: {}", other)),
        }
    }
}

/// Persisted metadata record for an uploaded file.
///
/// The `id` is allocated at creation and is used verbatim as the storage
/// namespace segment; it is never reused or mutated. All fields are
/// immutable once set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: Uuid,
    pub mime_type: String,
    pub size: i64,
    pub kind: UploadedFileKind,
    pub created_at: DateTime<Utc>,
}

/// Derived image metadata for a successfully thumbnailed upload.
///
/// Present iff both thumbnail renditions were written to storage. Width and
/// height already reflect EXIF orientation correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub thumbnail_extension: String,
}
