//! Storage gateway abstraction
//!
//! This module defines the gateway trait all storage backends must implement.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Move failed: {0}")]
    MoveFailed(String),

    #[error("Save failed: {0}")]
    SaveFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage gateway trait
///
/// The ingestion pipeline persists blobs through this interface without
/// coupling to a specific backend. Backends that relocate the source onto
/// directly addressable storage return the durable path from `move_file`;
/// backends that consume the source in place (e.g. remote object stores)
/// return `None`.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Move a transient file into durable storage under `dest_key`.
    ///
    /// Returns the durable filesystem path when the backend exposes one.
    async fn move_file(
        &self,
        source: &Path,
        dest_key: &str,
        content_type: &str,
    ) -> StorageResult<Option<PathBuf>>;

    /// Save a byte buffer under `dest_key`.
    async fn save(&self, dest_key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()>;

    /// Delete a key prefix and everything under it.
    ///
    /// Callers treat this as best-effort: failures are logged at the call
    /// site, not propagated.
    async fn delete_dir(&self, dest_key: &str) -> StorageResult<()>;
}
