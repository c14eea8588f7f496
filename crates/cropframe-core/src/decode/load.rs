//! Source image decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{ImageLoadError, Orientation, Raster};

/// Decode a source photo from bytes, applying EXIF orientation correction.
///
/// Accepts any format the build enables in the `image` crate (JPEG, PNG,
/// WebP). The returned raster is upright, so the natural dimensions the
/// crop editor works with match what the user sees.
///
/// # Errors
///
/// Returns `ImageLoadError::InvalidFormat` if the format cannot be guessed,
/// `ImageLoadError::CorruptedFile` if decoding fails, and
/// `ImageLoadError::EmptyImage` for images without pixels.
pub fn load_image(bytes: &[u8]) -> Result<Raster, ImageLoadError> {
    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImageLoadError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(ImageLoadError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| ImageLoadError::CorruptedFile(e.to_string()))?;

    let raster = Raster::from_rgb_image(apply_orientation(img, orientation).into_rgb8());
    if raster.is_empty() {
        return Err(ImageLoadError::EmptyImage {
            width: raster.width,
            height: raster.height,
        });
    }

    log::info!(
        "decoded source image {}x{} ({:?})",
        raster.width,
        raster.height,
        orientation
    );
    Ok(raster)
}

/// EXIF orientation of `bytes`, or `Normal` when there is none.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
