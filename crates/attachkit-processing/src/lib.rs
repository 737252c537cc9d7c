//! Attachkit Processing Library
//!
//! Attachment ingestion: policy validation, encoding detection, image
//! thumbnailing, and the orchestrator that sequences them against the
//! storage gateway and record store.

pub mod encoding;
pub mod image;
pub mod pipeline;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use self::image::ImagePipeline;
pub use pipeline::{IngestError, IngestionPipeline};
pub use types::{ImageOutcome, ImageSource, IngestionResult, UploadRequest};
pub use validator::{PolicyError, UploadPolicy};
