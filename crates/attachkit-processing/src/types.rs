//! Types for the ingestion pipeline.

use std::path::PathBuf;

use attachkit_core::models::ImageInfo;
use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

/// A raw uploaded file as handed over by the transport layer.
///
/// The temporary location is exclusively owned by the in-flight ingestion
/// and is consumed or removed within one pipeline run.
#[derive(Clone, Debug)]
pub struct UploadRequest {
    pub temp_path: PathBuf,
    pub filename: String,
    pub size: u64,
}

/// Source the image pipeline reads from: an in-memory buffer when one was
/// already read for encoding detection, or the durable path reported by the
/// storage gateway. Both must be accepted uniformly.
#[derive(Clone, Debug)]
pub enum ImageSource {
    Buffer(Bytes),
    Path(PathBuf),
}

/// Outcome of the image pipeline for one upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageOutcome {
    /// MIME type is exempt from rasterization; nothing was attempted.
    Skipped,
    /// Both thumbnail renditions were persisted.
    Succeeded {
        width: u32,
        height: u32,
        thumbnail_extension: String,
    },
    /// Decoding, rendering, or persisting failed; any partial thumbnail set
    /// has been cleaned up.
    Failed,
}

/// Result of a successful ingestion.
///
/// `image` is non-null iff both thumbnail renditions were written; a
/// degraded ingestion reports success with `encoding`/`image` unset.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionResult {
    pub uploaded_file_id: Uuid,
    pub filename: String,
    pub mime_type: String,
    pub size: u64,
    pub encoding: Option<String>,
    pub image: Option<ImageInfo>,
}
