//! Image pipeline: decode, orient, and render thumbnail renditions.
//!
//! Failures here never escape as ingestion failures: corrupt data, a failed
//! render, or a failed persist all degrade to [`ImageOutcome::Failed`] after
//! cleaning up any partial thumbnail set.

pub mod orientation;
pub mod processor;
pub mod thumbnails;

pub use processor::DecodedImage;

use std::sync::Arc;

use attachkit_core::constants::{RASTERIZATION_EXEMPT_MIME_TYPES, THUMBNAIL_BOXES};
use attachkit_storage::StorageGateway;
use bytes::Bytes;

use crate::types::{ImageOutcome, ImageSource};

/// Derives image metadata and persists the two thumbnail renditions for an
/// upload.
pub struct ImagePipeline {
    storage: Arc<dyn StorageGateway>,
    quality: u8,
}

impl ImagePipeline {
    pub fn new(storage: Arc<dyn StorageGateway>, quality: u8) -> Self {
        Self { storage, quality }
    }

    /// Process one upload's image content.
    ///
    /// Vector/document MIME types are skipped without decoding. Otherwise the
    /// source is decoded, orientation-corrected, and rendered into the
    /// `outside-360` and `outside-720` renditions under
    /// `{namespace}/thumbnails/`. Either both renditions end up persisted or
    /// the thumbnails sub-namespace is deleted.
    pub async fn process(
        &self,
        source: Option<ImageSource>,
        mime_type: &str,
        namespace: &str,
    ) -> ImageOutcome {
        if RASTERIZATION_EXEMPT_MIME_TYPES.contains(&mime_type) {
            return ImageOutcome::Skipped;
        }

        let data = match self.load(source).await {
            Some(data) => data,
            None => return ImageOutcome::Failed,
        };

        let decoded = match processor::decode(&data) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!(
                    mime_type = %mime_type,
                    namespace = %namespace,
                    error = %e,
                    "Image decoding failed; skipping thumbnails"
                );
                return ImageOutcome::Failed;
            }
        };

        let format = decoded.format;
        let frame_count = decoded.frame_count;
        let (image, width, height) = orientation::correct_orientation(decoded);
        let extension = thumbnails::thumbnail_extension(format);

        tracing::debug!(
            format = ?format,
            width = width,
            height = height,
            frame_count = frame_count,
            "Decoded image for thumbnailing"
        );

        let thumbnails_namespace = format!("{}/thumbnails", namespace);
        let mut guard = ThumbnailGuard::new(Arc::clone(&self.storage), &thumbnails_namespace);

        for &target in THUMBNAIL_BOXES {
            let rendered = match thumbnails::render_thumbnail(&image, target, self.quality) {
                Ok(rendered) => rendered,
                Err(e) => {
                    tracing::warn!(
                        target = target,
                        namespace = %namespace,
                        error = %e,
                        "Thumbnail rendering failed"
                    );
                    guard.disarm();
                    self.cleanup(&thumbnails_namespace).await;
                    return ImageOutcome::Failed;
                }
            };

            let key = format!("{}/outside-{}.{}", thumbnails_namespace, target, extension);
            if let Err(e) = self.storage.save(&key, rendered, "image/jpeg").await {
                tracing::warn!(
                    key = %key,
                    error = %e,
                    "Thumbnail persistence failed"
                );
                guard.disarm();
                self.cleanup(&thumbnails_namespace).await;
                return ImageOutcome::Failed;
            }
        }

        guard.disarm();

        ImageOutcome::Succeeded {
            width,
            height,
            thumbnail_extension: extension,
        }
    }

    async fn load(&self, source: Option<ImageSource>) -> Option<Bytes> {
        match source {
            Some(ImageSource::Buffer(data)) => Some(data),
            Some(ImageSource::Path(path)) => match tokio::fs::read(&path).await {
                Ok(data) => Some(Bytes::from(data)),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read image source"
                    );
                    None
                }
            },
            None => {
                tracing::warn!("No image source available; skipping thumbnails");
                None
            }
        }
    }

    /// Remove the entire thumbnails sub-namespace so no partial rendition
    /// set survives a failure.
    async fn cleanup(&self, thumbnails_namespace: &str) {
        if let Err(e) = self.storage.delete_dir(thumbnails_namespace).await {
            tracing::warn!(
                namespace = %thumbnails_namespace,
                error = %e,
                "Failed to clean up thumbnails after error"
            );
        }
    }
}

/// Deletes the thumbnails sub-namespace if the rendition loop is dropped
/// mid-flight, so a cancelled caller never strands a partial set. Error and
/// success paths disarm it and handle cleanup inline.
struct ThumbnailGuard {
    storage: Arc<dyn StorageGateway>,
    namespace: String,
    armed: bool,
}

impl ThumbnailGuard {
    fn new(storage: Arc<dyn StorageGateway>, namespace: &str) -> Self {
        Self {
            storage,
            namespace: namespace.to_string(),
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for ThumbnailGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let storage = Arc::clone(&self.storage);
        let namespace = std::mem::take(&mut self.namespace);
        handle.spawn(async move {
            if let Err(e) = storage.delete_dir(&namespace).await {
                tracing::warn!(
                    namespace = %namespace,
                    error = %e,
                    "Failed to clean up thumbnails after cancellation"
                );
            }
        });
    }
}
