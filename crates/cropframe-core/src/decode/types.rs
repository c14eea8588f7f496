//! Core types for source images and output rasters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a source image cannot be turned into pixels.
///
/// A load failure aborts session initialization entirely: no crop state
/// is created for an image that never decoded.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    /// The byte source is not a recognised image format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The image decoded but has no pixels.
    #[error("Image has invalid dimensions {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Natural pixel dimensions of a decoded source image.
///
/// This is all the geometry engine needs to know about the photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSize {
    pub natural_width: u32,
    pub natural_height: u32,
}

impl ImageSize {
    pub fn new(natural_width: u32, natural_height: u32) -> Self {
        Self {
            natural_width,
            natural_height,
        }
    }

    /// Natural width as a float, never below one pixel.
    #[inline]
    pub fn width_f64(&self) -> f64 {
        f64::from(self.natural_width.max(1))
    }

    /// Natural height as a float, never below one pixel.
    #[inline]
    pub fn height_f64(&self) -> f64 {
        f64::from(self.natural_height.max(1))
    }
}

/// An RGB pixel buffer.
///
/// Used both for decoded source photos and for the fixed-size output of
/// the crop extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl Raster {
    /// Create a new Raster with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a Raster from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Natural dimensions of this raster.
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    /// Expected buffer length for the declared dimensions.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }

    /// True when the buffer length matches the declared dimensions.
    pub fn is_consistent(&self) -> bool {
        self.pixels.len() == self.expected_len()
    }

    /// Check if this is an empty/invalid raster.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// RGB triple at integer coordinates, or `None` outside the raster.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        match self.pixels.get(idx..idx + 3)? {
            &[r, g, b] => Some([r, g, b]),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal);
    }

    #[test]
    fn test_raster_creation() {
        let raster = Raster::new(100, 50, vec![0u8; 100 * 50 * 3]);
        assert_eq!(raster.size(), ImageSize::new(100, 50));
        assert!(raster.is_consistent());
        assert!(!raster.is_empty());
    }

    #[test]
    fn test_raster_empty() {
        let raster = Raster::new(0, 0, vec![]);
        assert!(raster.is_empty());
    }

    #[test]
    fn test_raster_pixel_lookup() {
        let raster = Raster::new(2, 1, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(raster.pixel(0, 0), Some([1, 2, 3]));
        assert_eq!(raster.pixel(1, 0), Some([4, 5, 6]));
        assert_eq!(raster.pixel(2, 0), None);
        assert_eq!(raster.pixel(0, 1), None);
    }

    #[test]
    fn test_raster_pixel_short_buffer() {
        let raster = Raster {
            width: 2,
            height: 2,
            pixels: vec![0; 6],
        };
        assert_eq!(raster.pixel(0, 0), Some([0, 0, 0]));
        assert_eq!(raster.pixel(1, 1), None);
    }

    #[test]
    fn test_image_size_floors_at_one_pixel() {
        let size = ImageSize::new(0, 0);
        assert_eq!(size.width_f64(), 1.0);
        assert_eq!(size.height_f64(), 1.0);
    }

    #[test]
    fn test_load_error_display() {
        let err = ImageLoadError::EmptyImage {
            width: 0,
            height: 10,
        };
        assert_eq!(err.to_string(), "Image has invalid dimensions 0x10");
        assert_eq!(
            ImageLoadError::InvalidFormat.to_string(),
            "Invalid or unsupported image format"
        );
    }
}
