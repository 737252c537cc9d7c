//! Image decoding and metadata extraction.

use std::io::Cursor;

use anyhow::Context;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};

/// A decoded raster image together with the container metadata the pipeline
/// needs: native dimensions, format, EXIF orientation, and frame count for
/// animated sources.
pub struct DecodedImage {
    pub image: DynamicImage,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub orientation: Option<u8>,
    pub frame_count: u32,
}

/// Decode image bytes and extract container metadata.
///
/// For animated sources only the first frame is decoded; dimensions are
/// per-frame, not the stacked canvas. Corrupt or unsupported data is an
/// error the caller recovers from.
pub fn decode(data: &[u8]) -> anyhow::Result<DecodedImage> {
    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    let format = reader.format().context("unrecognized image format")?;
    let image = reader.decode()?;

    let (width, height) = image.dimensions();
    let orientation = read_exif_orientation(data);
    let frame_count = count_frames(data, format);

    Ok(DecodedImage {
        image,
        width,
        height,
        format,
        orientation,
        frame_count,
    })
}

/// Read the EXIF orientation tag (1-8) from image data, if present.
pub fn read_exif_orientation(data: &[u8]) -> Option<u8> {
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(data))
        .ok()?;

    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .filter(|v| (1..=8).contains(v))
        .map(|v| v as u8)
}

/// Count GIF frames by walking frame headers; pixel data is never decoded.
fn count_frames(data: &[u8], format: ImageFormat) -> u32 {
    if format != ImageFormat::Gif {
        return 1;
    }

    let mut options = gif::DecodeOptions::new();
    options.skip_frame_decoding(true);

    match options.read_info(Cursor::new(data)) {
        Ok(mut decoder) => {
            let mut frames = 0u32;
            while let Ok(Some(_)) = decoder.next_frame_info() {
                frames += 1;
            }
            frames.max(1)
        }
        Err(_) => 1,
    }
}
