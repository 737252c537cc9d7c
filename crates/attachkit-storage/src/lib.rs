//! Attachkit Storage Library
//!
//! This crate provides the storage gateway abstraction the ingestion
//! pipeline writes through, plus a local filesystem backend.
//!
//! # Storage key format
//!
//! Keys are relative paths under the gateway root, namespaced per record:
//!
//! - **Original file**: `{namespace}/{filename}`
//! - **Thumbnails**: `{namespace}/thumbnails/outside-{box}.{ext}`
//!
//! where `{namespace}` is derived solely from the record id. Keys must not
//! contain `..` or a leading `/`.

pub mod local;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use traits::{StorageError, StorageGateway, StorageResult};
