//! Best-effort content encoding detection.
//!
//! The sniffer classifies a byte buffer as binary or text and, for text,
//! guesses a character encoding. It is a cost-bounded, never-fatal stage:
//! the pipeline only invokes it for small uploads and absorbs any read
//! failure into a `None` classification.

use chardetng::EncodingDetector;

/// Bytes examined when deciding binary vs. text.
const BINARY_SNIFF_WINDOW: usize = 8000;

/// Classify a byte buffer, returning an encoding tag.
///
/// Returns `None` for empty input, `"binary"` when the leading window
/// contains a null byte, `"utf-8"` for valid UTF-8, and otherwise the
/// detector's best guess (lower-cased WHATWG name, e.g. `"windows-1252"`).
pub fn sniff_encoding(data: &[u8]) -> Option<String> {
    if data.is_empty() {
        return None;
    }

    if data.iter().take(BINARY_SNIFF_WINDOW).any(|&b| b == 0) {
        return Some("binary".to_string());
    }

    if std::str::from_utf8(data).is_ok() {
        return Some("utf-8".to_string());
    }

    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    let encoding = detector.guess(None, true);

    Some(encoding.name().to_lowercase())
}
