use attachkit_core::UploadConfig;

/// Upload policy violations
///
/// A rejected upload leaves zero trace: validation runs before any record is
/// created or any byte is moved into permanent storage.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("File size exceeds maximum allowed limit: {size} bytes (max: {max} bytes)")]
    SizeExceeded { size: u64, max: u64 },

    #[error("File type not allowed: {0}")]
    TypeNotAllowed(String),

    #[error("File extension not allowed: {0}")]
    ExtensionDenied(String),
}

/// Upload policy validator
///
/// Pure accept/reject decision over filename, declared size, and resolved
/// MIME type. Rules are evaluated in order; the first failure wins.
pub struct UploadPolicy {
    max_file_size: u64,
    allowed_mime_types: Vec<String>,
    denied_extensions: Vec<String>,
}

impl UploadPolicy {
    pub fn new(
        max_file_size: u64,
        allowed_mime_types: Vec<String>,
        denied_extensions: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_mime_types,
            denied_extensions,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(
            config.max_file_size,
            config.allowed_mime_types.clone(),
            config.denied_extensions.clone(),
        )
    }

    /// Validate an upload against size, MIME allow-list, and extension
    /// deny-list, in that order.
    pub fn validate(
        &self,
        filename: &str,
        declared_size: u64,
        mime_type: Option<&str>,
    ) -> Result<(), PolicyError> {
        if declared_size > self.max_file_size {
            return Err(PolicyError::SizeExceeded {
                size: declared_size,
                max: self.max_file_size,
            });
        }

        let mime = mime_type.unwrap_or("unknown");
        if !self.allowed_mime_types.iter().any(|m| m == mime) {
            return Err(PolicyError::TypeNotAllowed(mime.to_string()));
        }

        if let Some(extension) = filename.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()) {
            if self.denied_extensions.contains(&extension) {
                return Err(PolicyError::ExtensionDenied(extension));
            }
        }

        Ok(())
    }
}
