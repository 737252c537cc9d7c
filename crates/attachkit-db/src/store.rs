use std::str::FromStr;

use async_trait::async_trait;
use attachkit_core::models::{UploadedFile, UploadedFileKind};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid record kind: {0}")]
    InvalidKind(String),
}

/// Result type for record store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Metadata record store
///
/// Identifier allocation must be atomic and collision-free; the returned id
/// is used verbatim as the storage namespace segment, so a record must exist
/// before any storage write occurs.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create an uploaded file record, allocating a fresh identifier.
    async fn create(
        &self,
        mime_type: &str,
        size: i64,
        kind: UploadedFileKind,
    ) -> StoreResult<UploadedFile>;

    /// Fetch a record by id.
    async fn get(&self, id: Uuid) -> StoreResult<Option<UploadedFile>>;
}

#[derive(sqlx::FromRow)]
struct UploadedFileRow {
    id: Uuid,
    mime_type: String,
    size: i64,
    kind: String,
    created_at: DateTime<Utc>,
}

impl UploadedFileRow {
    fn into_model(self) -> StoreResult<UploadedFile> {
        let kind =
            UploadedFileKind::from_str(&self.kind).map_err(StoreError::InvalidKind)?;
        Ok(UploadedFile {
            id: self.id,
            mime_type: self.mime_type,
            size: self.size,
            kind,
            created_at: self.created_at,
        })
    }
}

/// Postgres-backed record store
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn create(
        &self,
        mime_type: &str,
        size: i64,
        kind: UploadedFileKind,
    ) -> StoreResult<UploadedFile> {
        let row: UploadedFileRow = sqlx::query_as(
            r#"
            INSERT INTO uploaded_file (id, mime_type, size, kind, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, mime_type, size, kind, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(mime_type)
        .bind(size)
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await?;

        let record = row.into_model()?;

        tracing::info!(
            id = %record.id,
            mime_type = %record.mime_type,
            size = record.size,
            "Created uploaded file record"
        );

        Ok(record)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<UploadedFile>> {
        let row: Option<UploadedFileRow> = sqlx::query_as(
            r#"
            SELECT id, mime_type, size, kind, created_at
            FROM uploaded_file
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UploadedFileRow::into_model).transpose()
    }
}
