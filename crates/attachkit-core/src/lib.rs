//! Attachkit Core Library
//!
//! This crate provides the domain models, constants, and configuration shared
//! across the attachkit crates.

pub mod config;
pub mod constants;
pub mod models;

// Re-export commonly used types
pub use config::UploadConfig;
pub use models::{ImageInfo, UploadedFile, UploadedFileKind};
