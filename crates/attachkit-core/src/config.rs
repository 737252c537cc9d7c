//! Configuration module
//!
//! Upload pipeline configuration with compiled defaults and environment
//! variable overrides.

use std::env;

use crate::constants::{
    ALLOWED_MIME_TYPES, DEFAULT_ATTACHMENTS_PATH_SEGMENT, DENIED_EXTENSIONS, MAX_FILE_SIZE,
    MAX_SIZE_TO_GET_ENCODING, THUMBNAIL_QUALITY,
};

/// Upload pipeline configuration
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub max_file_size: u64,
    pub max_size_to_get_encoding: u64,
    pub allowed_mime_types: Vec<String>,
    pub denied_extensions: Vec<String>,
    pub attachments_path_segment: String,
    pub thumbnail_quality: u8,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            max_size_to_get_encoding: MAX_SIZE_TO_GET_ENCODING,
            allowed_mime_types: ALLOWED_MIME_TYPES.iter().map(|s| s.to_string()).collect(),
            denied_extensions: DENIED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            attachments_path_segment: DEFAULT_ATTACHMENTS_PATH_SEGMENT.to_string(),
            thumbnail_quality: THUMBNAIL_QUALITY,
        }
    }
}

impl UploadConfig {
    /// Load configuration from environment variables, falling back to the
    /// compiled defaults for anything unset.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Some(v) = parse_env::<u64>("ATTACHKIT_MAX_FILE_SIZE") {
            config.max_file_size = v;
        }
        if let Some(v) = parse_env::<u64>("ATTACHKIT_MAX_SIZE_TO_GET_ENCODING") {
            config.max_size_to_get_encoding = v;
        }
        if let Ok(v) = env::var("ATTACHKIT_ALLOWED_MIME_TYPES") {
            config.allowed_mime_types = split_list(&v);
        }
        if let Ok(v) = env::var("ATTACHKIT_DENIED_EXTENSIONS") {
            config.denied_extensions = split_list(&v);
        }
        if let Ok(v) = env::var("ATTACHKIT_ATTACHMENTS_PATH_SEGMENT") {
            if !v.trim().is_empty() {
                config.attachments_path_segment = v;
            }
        }
        if let Some(v) = parse_env::<u8>("ATTACHKIT_THUMBNAIL_QUALITY") {
            config.thumbnail_quality = v.clamp(1, 100);
        }

        config
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
