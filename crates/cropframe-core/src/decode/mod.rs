//! Source image loading for crop sessions.
//!
//! This module provides functionality for:
//! - Decoding uploaded photos (JPEG, PNG, WebP) into RGB rasters
//! - Correcting EXIF orientation so natural dimensions match what users see
//! - Discarding decodes that were superseded by a newer request
//!
//! Decoding must finish (or fail) before a crop session is opened; a
//! failed decode never produces crop state.

mod load;
mod tracker;
mod types;

pub use load::load_image;
pub use tracker::{LoadTicket, LoadTracker};
pub use types::{ImageLoadError, ImageSize, Orientation, Raster};
