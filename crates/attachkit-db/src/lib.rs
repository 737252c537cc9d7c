//! Attachkit DB Library
//!
//! Record store for uploaded file metadata. The pipeline only needs two
//! operations: create (which allocates the identifier used as the storage
//! namespace) and read. A Postgres-backed store is provided for production
//! and an in-memory store for tests.

pub mod memory;
pub mod store;

pub use memory::MemoryRecordStore;
pub use store::{PgRecordStore, RecordStore, StoreError, StoreResult};
