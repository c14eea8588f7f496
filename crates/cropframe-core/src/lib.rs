//! Cropframe Core - crop geometry and extraction engine
//!
//! This crate provides the pure engine behind the Cropframe photo cropper:
//! decoding uploaded photos, the crop rectangle state model with its
//! coordinate transforms, editor surface rendering, resampling of the final
//! output raster, and encoding it for upload.

pub mod config;
pub mod decode;
pub mod encode;
pub mod extract;
pub mod geometry;
pub mod interaction;
pub mod render;
pub mod session;

pub use config::{Color, ConfigError, CropConfig, CropShape, OutputSize, SafeArea, TemplateRegistry};
pub use decode::{load_image, ImageLoadError, ImageSize, LoadTicket, LoadTracker, Raster};
pub use encode::{encode_jpeg, encode_png, EncodeError};
pub use extract::{apply_crop, ImageProcessingError, InterpolationFilter};
pub use geometry::{
    apply_drag, apply_zoom, compute_display_transform, initialize_crop, reset, restore, CropData,
    DisplayTransform, ScreenRect,
};
pub use interaction::{PointerId, PointerSession};
pub use render::{RenderError, RenderSource, Surface};
pub use session::{CropObserver, CropSession, SessionError};
