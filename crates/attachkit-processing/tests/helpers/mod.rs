//! Shared fixtures and doubles for ingestion tests.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use attachkit_core::UploadConfig;
use attachkit_db::MemoryRecordStore;
use attachkit_processing::{IngestionPipeline, UploadRequest};
use attachkit_storage::{LocalStorage, StorageError, StorageGateway, StorageResult};
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::TempDir;

/// A pipeline wired to a tempdir-backed local gateway and an in-memory
/// record store.
pub struct TestHarness {
    pub storage_dir: TempDir,
    pub upload_dir: TempDir,
    pub records: Arc<MemoryRecordStore>,
    pub pipeline: IngestionPipeline,
}

impl TestHarness {
    pub async fn new() -> Self {
        let storage_dir = tempfile::tempdir().expect("Failed to create storage directory");
        let storage = Arc::new(
            LocalStorage::new(storage_dir.path())
                .await
                .expect("Failed to create local storage"),
        );
        Self::with_gateway(storage_dir, storage).await
    }

    pub async fn with_gateway(storage_dir: TempDir, gateway: Arc<dyn StorageGateway>) -> Self {
        let upload_dir = tempfile::tempdir().expect("Failed to create upload directory");
        let records = Arc::new(MemoryRecordStore::new());
        let pipeline = IngestionPipeline::new(
            gateway,
            records.clone(),
            UploadConfig::default(),
        );
        Self {
            storage_dir,
            upload_dir,
            records,
            pipeline,
        }
    }

    /// Write `bytes` to a transient upload location and describe it.
    pub fn stage_upload(&self, filename: &str, bytes: &[u8]) -> UploadRequest {
        let temp_path = self.upload_dir.path().join(format!("upload-{}", filename));
        std::fs::write(&temp_path, bytes).expect("Failed to stage upload");
        UploadRequest {
            temp_path,
            filename: filename.to_string(),
            size: bytes.len() as u64,
        }
    }

    pub fn namespace_dir(&self, id: uuid::Uuid) -> PathBuf {
        self.storage_dir.path().join("attachments").join(id.to_string())
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([40, 40, 200]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
        .unwrap();
    buffer
}

/// JPEG whose APP1 EXIF segment carries the given orientation value,
/// inserted right after the SOI marker.
pub fn oriented_jpeg_bytes(width: u32, height: u32, orientation: u8) -> Vec<u8> {
    let jpeg = jpeg_bytes(width, height);

    // Little-endian TIFF header with a single IFD0 Orientation entry.
    let mut tiff = vec![0x49, 0x49, 0x2a, 0x00, 0x08, 0x00, 0x00, 0x00];
    tiff.extend_from_slice(&[0x01, 0x00]);
    tiff.extend_from_slice(&[0x12, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00]);
    tiff.extend_from_slice(&[orientation, 0x00, 0x00, 0x00]);
    tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);

    let mut out = Vec::with_capacity(jpeg.len() + payload.len() + 4);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xff, 0xe1]);
    out.extend_from_slice(&(payload.len() as u16 + 2).to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Gateway that fails the Nth `save` call (1-based); everything else is
/// delegated to a real local backend.
pub struct FlakySaveStorage {
    inner: LocalStorage,
    saves: AtomicUsize,
    fail_on: usize,
}

impl FlakySaveStorage {
    pub async fn new(base_path: &Path, fail_on: usize) -> Self {
        Self {
            inner: LocalStorage::new(base_path).await.unwrap(),
            saves: AtomicUsize::new(0),
            fail_on,
        }
    }
}

#[async_trait]
impl StorageGateway for FlakySaveStorage {
    async fn move_file(
        &self,
        source: &Path,
        dest_key: &str,
        content_type: &str,
    ) -> StorageResult<Option<PathBuf>> {
        self.inner.move_file(source, dest_key, content_type).await
    }

    async fn save(&self, dest_key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()> {
        let call = self.saves.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            return Err(StorageError::SaveFailed("injected failure".to_string()));
        }
        self.inner.save(dest_key, data, content_type).await
    }

    async fn delete_dir(&self, dest_key: &str) -> StorageResult<()> {
        self.inner.delete_dir(dest_key).await
    }
}

/// Gateway whose Nth `save` call (1-based) never resolves, holding the
/// rendition loop in flight until the caller gives up on it.
pub struct StallingSaveStorage {
    inner: LocalStorage,
    saves: AtomicUsize,
    stall_on: usize,
}

impl StallingSaveStorage {
    pub async fn new(base_path: &Path, stall_on: usize) -> Self {
        Self {
            inner: LocalStorage::new(base_path).await.unwrap(),
            saves: AtomicUsize::new(0),
            stall_on,
        }
    }
}

#[async_trait]
impl StorageGateway for StallingSaveStorage {
    async fn move_file(
        &self,
        source: &Path,
        dest_key: &str,
        content_type: &str,
    ) -> StorageResult<Option<PathBuf>> {
        self.inner.move_file(source, dest_key, content_type).await
    }

    async fn save(&self, dest_key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()> {
        let call = self.saves.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.stall_on {
            std::future::pending::<()>().await;
        }
        self.inner.save(dest_key, data, content_type).await
    }

    async fn delete_dir(&self, dest_key: &str) -> StorageResult<()> {
        self.inner.delete_dir(dest_key).await
    }
}

/// Gateway that consumes the source bytes without reporting a durable path,
/// leaving the transient location in place (remote object store behavior).
pub struct ConsumingStorage {
    inner: LocalStorage,
}

impl ConsumingStorage {
    pub async fn new(base_path: &Path) -> Self {
        Self {
            inner: LocalStorage::new(base_path).await.unwrap(),
        }
    }
}

#[async_trait]
impl StorageGateway for ConsumingStorage {
    async fn move_file(
        &self,
        source: &Path,
        dest_key: &str,
        content_type: &str,
    ) -> StorageResult<Option<PathBuf>> {
        let data = tokio::fs::read(source).await?;
        self.inner.save(dest_key, data, content_type).await?;
        Ok(None)
    }

    async fn save(&self, dest_key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()> {
        self.inner.save(dest_key, data, content_type).await
    }

    async fn delete_dir(&self, dest_key: &str) -> StorageResult<()> {
        self.inner.delete_dir(dest_key).await
    }
}

/// Gateway whose primary move always fails.
pub struct BrokenMoveStorage;

#[async_trait]
impl StorageGateway for BrokenMoveStorage {
    async fn move_file(
        &self,
        _source: &Path,
        _dest_key: &str,
        _content_type: &str,
    ) -> StorageResult<Option<PathBuf>> {
        Err(StorageError::MoveFailed("gateway unavailable".to_string()))
    }

    async fn save(&self, _dest_key: &str, _data: Vec<u8>, _content_type: &str) -> StorageResult<()> {
        Err(StorageError::SaveFailed("gateway unavailable".to_string()))
    }

    async fn delete_dir(&self, _dest_key: &str) -> StorageResult<()> {
        Ok(())
    }
}
