//! Upload security and processing limits.

/// Maximum accepted upload size in bytes.
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Encoding detection is skipped for files larger than this (a cost bound,
/// not a correctness requirement).
pub const MAX_SIZE_TO_GET_ENCODING: u64 = 8 * 1024 * 1024;

/// MIME types accepted for upload.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    // Images
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
    // Documents
    "application/pdf",
    "text/plain",
    "text/markdown",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    // Archives
    "application/zip",
    "application/x-rar-compressed",
    "application/x-7z-compressed",
];

/// Executable and script extensions rejected regardless of MIME type.
pub const DENIED_EXTENSIONS: &[&str] = &[
    "exe", "bat", "cmd", "scr", "pif", "com", "jar", "php", "asp", "jsp",
];

/// MIME types never decoded as raster images (no thumbnails derived).
pub const RASTERIZATION_EXEMPT_MIME_TYPES: &[&str] = &["image/svg+xml", "application/pdf"];

/// Storage path segment under which attachment namespaces live.
pub const DEFAULT_ATTACHMENTS_PATH_SEGMENT: &str = "attachments";

/// Bounding boxes for the generated thumbnail renditions.
pub const THUMBNAIL_BOXES: &[u32] = &[360, 720];

/// JPEG quality used when encoding thumbnail renditions.
pub const THUMBNAIL_QUALITY: u8 = 75;
