//! Ingestion pipeline: validate → record → sniff → store → thumbnail.
//!
//! The orchestrator sequences the policy validator, record store, encoding
//! sniffer, storage gateway, and image pipeline. Only policy rejections and
//! failures around the primary content (record creation, the original file
//! move) terminate an ingestion; everything else degrades to absent optional
//! fields in the result.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use attachkit_core::models::{ImageInfo, UploadedFileKind};
use attachkit_core::UploadConfig;
use attachkit_db::{RecordStore, StoreError};
use attachkit_storage::{StorageError, StorageGateway};
use bytes::Bytes;

use crate::encoding::sniff_encoding;
use crate::image::ImagePipeline;
use crate::types::{ImageOutcome, ImageSource, IngestionResult, UploadRequest};
use crate::validator::{PolicyError, UploadPolicy};

/// Fatal ingestion errors
///
/// Recovered stages (encoding detection, image decoding, thumbnailing) never
/// surface here; they are absorbed and reflected as absent optional fields.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("Record creation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Primary file move failed: {0}")]
    Storage(#[from] StorageError),
}

/// Attachment ingestion pipeline
///
/// Collaborators are injected explicitly; the pipeline holds no global
/// state and each ingestion exclusively owns its upload's byte source.
pub struct IngestionPipeline {
    storage: Arc<dyn StorageGateway>,
    records: Arc<dyn RecordStore>,
    policy: UploadPolicy,
    images: ImagePipeline,
    config: UploadConfig,
}

impl IngestionPipeline {
    pub fn new(
        storage: Arc<dyn StorageGateway>,
        records: Arc<dyn RecordStore>,
        config: UploadConfig,
    ) -> Self {
        Self {
            policy: UploadPolicy::from_config(&config),
            images: ImagePipeline::new(storage.clone(), config.thumbnail_quality),
            storage,
            records,
            config,
        }
    }

    /// Ingest one uploaded file.
    ///
    /// On success the original is persisted at `{namespace}/{filename}` and
    /// the result's `image` field is set iff both thumbnail renditions were
    /// written. The transient upload location is removed on every exit path
    /// where the content was not relocated into durable storage.
    pub async fn ingest(&self, upload: UploadRequest) -> Result<IngestionResult, IngestError> {
        let mut temp_guard = TempFileGuard::new(upload.temp_path.clone());

        let filename = sanitize_filename(&upload.filename);
        let mime_type = mime_guess::from_path(&filename).first_raw();

        self.policy.validate(&filename, upload.size, mime_type)?;
        // The allow-list rejects unresolved MIME types, so this is reached
        // only with a concrete type.
        let mime_type = mime_type.unwrap_or("application/octet-stream");

        let record = self
            .records
            .create(mime_type, upload.size as i64, UploadedFileKind::Attachment)
            .await?;
        let namespace = format!("{}/{}", self.config.attachments_path_segment, record.id);

        // Buffer the bytes for encoding detection before the move consumes
        // the temporary location. Read failures degrade to no classification.
        let mut buffer: Option<Bytes> = None;
        let mut encoding: Option<String> = None;
        if upload.size <= self.config.max_size_to_get_encoding {
            match tokio::fs::read(&upload.temp_path).await {
                Ok(data) => {
                    let data = Bytes::from(data);
                    encoding = sniff_encoding(&data);
                    buffer = Some(data);
                }
                Err(e) => {
                    tracing::warn!(
                        path = %upload.temp_path.display(),
                        error = %e,
                        "Failed to read upload for encoding detection"
                    );
                }
            }
        }

        // An attachment record without its primary content is an invalid
        // state, so a failed move is fatal.
        let durable_path = self
            .storage
            .move_file(
                &upload.temp_path,
                &format!("{}/{}", namespace, filename),
                mime_type,
            )
            .await?;
        if durable_path.is_some() {
            temp_guard.disarm();
        }

        let source = buffer
            .map(ImageSource::Buffer)
            .or(durable_path.map(ImageSource::Path));
        let outcome = self.images.process(source, mime_type, &namespace).await;

        let image = match outcome {
            ImageOutcome::Succeeded {
                width,
                height,
                thumbnail_extension,
            } => Some(ImageInfo {
                width,
                height,
                thumbnail_extension,
            }),
            ImageOutcome::Skipped | ImageOutcome::Failed => None,
        };

        Ok(IngestionResult {
            uploaded_file_id: record.id,
            filename,
            mime_type: mime_type.to_string(),
            size: upload.size,
            encoding,
            image,
        })
    }
}

/// Scoped cleanup for the transient upload location: removes the file on
/// drop unless the content was relocated into durable storage.
struct TempFileGuard {
    path: PathBuf,
    armed: bool,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove temporary upload"
                );
            }
        }
    }
}

pub(crate) fn sanitize_filename(filename: &str) -> String {
    const MAX: usize = 255;
    let path = Path::new(filename);
    let base = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    if base.contains("..") {
        return "invalid_filename".to_string();
    }
    let s: String = base
        .chars()
        .take(MAX)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.trim().is_empty() || s.len() < 3 {
        "file".to_string()
    } else {
        s
    }
}
