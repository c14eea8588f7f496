//! Final output extraction from a committed crop.

mod crop;
mod sample;

pub use crop::apply_crop;
pub use sample::InterpolationFilter;

use thiserror::Error;

use crate::geometry::CropData;

/// Errors that can occur while extracting the output raster.
///
/// A failed extraction leaves the editor state untouched; callers keep
/// whatever preview they already had.
#[derive(Debug, Error)]
pub enum ImageProcessingError {
    /// Output dimensions must both be non-zero.
    #[error("Invalid target size {width}x{height}")]
    InvalidTargetSize { width: u32, height: u32 },

    /// The source raster is empty or its buffer does not match its dimensions.
    #[error("Invalid source raster {width}x{height} with {len} bytes")]
    InvalidSource { width: u32, height: u32, len: usize },

    /// The crop rectangle is non-finite or has no area.
    #[error("Invalid crop rectangle {0:?}")]
    InvalidCrop(CropData),

    /// The output buffer could not be allocated.
    #[error("Failed to allocate {bytes} bytes for the output raster")]
    Allocation { bytes: usize },
}
