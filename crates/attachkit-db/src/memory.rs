//! In-memory record store for testing.

use async_trait::async_trait;
use attachkit_core::models::{UploadedFile, UploadedFileKind};
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{RecordStore, StoreResult};

/// In-memory record store for testing
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<UploadedFile>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records created so far.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create(
        &self,
        mime_type: &str,
        size: i64,
        kind: UploadedFileKind,
    ) -> StoreResult<UploadedFile> {
        let record = UploadedFile {
            id: Uuid::new_v4(),
            mime_type: mime_type.to_string(),
            size,
            kind,
            created_at: Utc::now(),
        };

        let mut records = self.records.write().await;
        records.push(record.clone());

        Ok(record)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<UploadedFile>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }
}
