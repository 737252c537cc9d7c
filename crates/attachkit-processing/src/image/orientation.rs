//! EXIF orientation correction.

use image::{imageops, DynamicImage};

use super::processor::DecodedImage;

/// Rotation and flip operations needed for a given EXIF orientation.
/// Returns (rotate_angle, flip_horizontal, flip_vertical).
pub fn orientation_transforms(orientation: u8) -> (Option<u16>, bool, bool) {
    match orientation {
        1 => (None, false, false),      // Normal
        2 => (None, true, false),       // Mirror horizontal
        3 => (Some(180), false, false), // Rotate 180
        4 => (None, false, true),       // Mirror vertical
        5 => (Some(270), true, false),  // Mirror horizontal + Rotate 270 CW
        6 => (Some(90), false, false),  // Rotate 90 CW
        7 => (Some(90), true, false),   // Mirror horizontal + Rotate 90 CW
        8 => (Some(270), false, false), // Rotate 270 CW
        _ => (None, false, false),      // Invalid, treat as normal
    }
}

/// Whether the orientation implies a 90°/270° rotation, swapping the
/// displayed width and height relative to the stored values.
pub fn swaps_dimensions(orientation: u8) -> bool {
    (5..=8).contains(&orientation)
}

/// Apply the EXIF orientation correction to a decoded image.
///
/// Pure transform: consumes the decoded handle and returns the corrected
/// image together with its display dimensions. Runs before any thumbnail
/// geometry is computed so renditions reflect the corrected orientation.
pub fn correct_orientation(decoded: DecodedImage) -> (DynamicImage, u32, u32) {
    let orientation = decoded.orientation.unwrap_or(1);
    let (rotate, flip_h, flip_v) = orientation_transforms(orientation);

    if rotate.is_none() && !flip_h && !flip_v {
        return (decoded.image, decoded.width, decoded.height);
    }

    tracing::debug!(
        orientation = orientation,
        rotate = ?rotate,
        flip_horizontal = flip_h,
        flip_vertical = flip_v,
        "Applying EXIF orientation"
    );

    let mut img = decoded.image;

    if let Some(angle) = rotate {
        img = rotate_by_angle(img, angle);
    }
    if flip_h {
        img = DynamicImage::ImageRgba8(imageops::flip_horizontal(&img.to_rgba8()));
    }
    if flip_v {
        img = DynamicImage::ImageRgba8(imageops::flip_vertical(&img.to_rgba8()));
    }

    let (width, height) = if swaps_dimensions(orientation) {
        (decoded.height, decoded.width)
    } else {
        (decoded.width, decoded.height)
    };

    (img, width, height)
}

/// Rotate image by 90, 180, or 270 degrees clockwise.
fn rotate_by_angle(img: DynamicImage, angle: u16) -> DynamicImage {
    match angle {
        90 => DynamicImage::ImageRgba8(imageops::rotate90(&img.to_rgba8())),
        180 => DynamicImage::ImageRgba8(imageops::rotate180(&img.to_rgba8())),
        270 => DynamicImage::ImageRgba8(imageops::rotate270(&img.to_rgba8())),
        _ => img,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageFormat, Rgba, RgbaImage};

    fn decoded_fixture(width: u32, height: u32, orientation: Option<u8>) -> DecodedImage {
        DecodedImage {
            image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                width,
                height,
                Rgba([0, 0, 255, 255]),
            )),
            width,
            height,
            format: ImageFormat::Jpeg,
            orientation,
            frame_count: 1,
        }
    }

    #[test]
    fn test_orientation_transforms_table() {
        assert_eq!(orientation_transforms(1), (None, false, false));
        assert_eq!(orientation_transforms(2), (None, true, false));
        assert_eq!(orientation_transforms(3), (Some(180), false, false));
        assert_eq!(orientation_transforms(4), (None, false, true));
        assert_eq!(orientation_transforms(5), (Some(270), true, false));
        assert_eq!(orientation_transforms(6), (Some(90), false, false));
        assert_eq!(orientation_transforms(7), (Some(90), true, false));
        assert_eq!(orientation_transforms(8), (Some(270), false, false));
        assert_eq!(orientation_transforms(0), (None, false, false));
        assert_eq!(orientation_transforms(9), (None, false, false));
    }

    #[test]
    fn test_no_orientation_is_identity() {
        let (img, w, h) = correct_orientation(decoded_fixture(40, 20, None));
        assert_eq!(img.dimensions(), (40, 20));
        assert_eq!((w, h), (40, 20));
    }

    #[test]
    fn test_orientation_6_swaps_dimensions() {
        let (img, w, h) = correct_orientation(decoded_fixture(3000, 4000, Some(6)));
        // Reported dimensions are swapped relative to the raw decoded values
        // and the pixels actually rotated to match.
        assert_eq!((w, h), (4000, 3000));
        assert_eq!(img.dimensions(), (4000, 3000));
    }

    #[test]
    fn test_orientation_8_swaps_dimensions() {
        let (img, w, h) = correct_orientation(decoded_fixture(40, 20, Some(8)));
        assert_eq!((w, h), (20, 40));
        assert_eq!(img.dimensions(), (20, 40));
    }

    #[test]
    fn test_orientation_3_keeps_dimensions() {
        let (img, w, h) = correct_orientation(decoded_fixture(40, 20, Some(3)));
        assert_eq!((w, h), (40, 20));
        assert_eq!(img.dimensions(), (40, 20));
    }

    #[test]
    fn test_mirror_orientations_keep_dimensions() {
        for orientation in [2u8, 4] {
            let (img, w, h) = correct_orientation(decoded_fixture(40, 20, Some(orientation)));
            assert_eq!((w, h), (40, 20));
            assert_eq!(img.dimensions(), (40, 20));
        }
    }
}
