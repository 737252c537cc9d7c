//! Thumbnail geometry and rendering.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};

/// Extension label used for stored thumbnail paths, derived from the decoded
/// source format. JPEG normalizes to the conventional "jpg"; everything else
/// keeps its native short name.
pub fn thumbnail_extension(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpg".to_string(),
        other => other
            .extensions_str()
            .first()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "img".to_string()),
    }
}

/// Compute "fit outside" dimensions for a target bounding box: scale so both
/// dimensions are at least `target` while preserving aspect ratio, never
/// enlarging beyond the native resolution.
pub fn fit_outside(width: u32, height: u32, target: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }

    let scale = f64::max(
        target as f64 / width as f64,
        target as f64 / height as f64,
    )
    .min(1.0);

    let out_w = ((width as f64 * scale).round() as u32).max(1);
    let out_h = ((height as f64 * scale).round() as u32).max(1);
    (out_w, out_h)
}

/// Render one thumbnail rendition: fit-outside resize to the target box and
/// encode as fixed-quality JPEG, independent of the source format and of the
/// extension label used for storage naming.
pub fn render_thumbnail(
    image: &DynamicImage,
    target: u32,
    quality: u8,
) -> anyhow::Result<Vec<u8>> {
    let (width, height) = image.dimensions();
    let (out_w, out_h) = fit_outside(width, height, target);

    let resized = if (out_w, out_h) == (width, height) {
        image.clone()
    } else {
        image.resize_exact(out_w, out_h, FilterType::Lanczos3)
    };

    let rgb = resized.to_rgb8();
    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buffer), quality);
    encoder.encode_image(&rgb)?;

    Ok(buffer)
}
