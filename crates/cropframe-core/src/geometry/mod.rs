//! Crop geometry engine.
//!
//! Three coordinate spaces are involved:
//!
//! - **source pixels**: the decoded photo, `natural_width × natural_height`
//! - **crop space**: source pixels multiplied by the zoom `scale`; all
//!   [`CropData`] fields live here
//! - **surface pixels**: the fixed `S×S` render surface the editor draws on
//!
//! The photo is fitted to the surface by `base_fit` and magnified by the
//! zoom scale, while the crop window's on-screen size depends on `base_fit`
//! alone. That split is what makes zoom move the photo under a fixed
//! window instead of resizing the window.

mod crop;
mod display;

pub use crop::{apply_drag, apply_zoom, initialize_crop, reset, restore, CropData, SourceRect};
pub use display::{base_fit_scale, compute_display_transform, DisplayTransform, ScreenRect};

/// Lowest zoom scale.
pub const MIN_SCALE: f64 = 0.5;
/// Highest zoom scale.
pub const MAX_SCALE: f64 = 3.0;
/// Multiplier applied per zoom step.
pub const ZOOM_STEP: f64 = 1.2;
/// Initial crop window edge as a fraction of the render surface.
pub const INITIAL_CROP_FRACTION: f64 = 0.4;
/// Edge length of the render surface in pixels.
pub const DEFAULT_SURFACE_SIZE: f64 = 400.0;
