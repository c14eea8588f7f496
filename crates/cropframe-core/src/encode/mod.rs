//! Encoding of output rasters for upload.
//!
//! Both encoders take a finished [`Raster`](crate::decode::Raster) from
//! [`apply_crop`](crate::extract::apply_crop) and validate it before handing
//! the pixels to the `image` crate.

mod jpeg;
mod png;

pub use self::jpeg::encode_jpeg;
pub use self::png::encode_png;

use thiserror::Error;

use crate::decode::Raster;

/// Errors that can occur while encoding an output raster.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match the raster dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: &'static str,
        message: String,
    },
}

fn validate(raster: &Raster) -> Result<(), EncodeError> {
    if raster.width == 0 || raster.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: raster.width,
            height: raster.height,
        });
    }
    if !raster.is_consistent() {
        return Err(EncodeError::InvalidPixelData {
            expected: raster.expected_len(),
            actual: raster.pixels.len(),
        });
    }
    Ok(())
}
