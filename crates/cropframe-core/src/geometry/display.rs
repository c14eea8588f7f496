//! Mapping from zoom-scaled crop space to render-surface pixels.
//!
//! A [`DisplayTransform`] is derived state: it is recomputed from the image
//! size and the current [`CropData`] every frame and thrown away afterwards.
//! Nothing in the geometry engine reads it to make a clamping decision.

use super::CropData;
use crate::decode::ImageSize;

/// Scale that fits the whole image inside an `S×S` surface, independent of zoom.
#[inline]
pub fn base_fit_scale(image: ImageSize, surface_size: f64) -> f64 {
    (surface_size / image.width_f64()).min(surface_size / image.height_f64())
}

/// Per-frame placement of the photo on the render surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTransform {
    /// Left edge of the scaled image on the surface.
    pub offset_x: f64,
    /// Top edge of the scaled image on the surface.
    pub offset_y: f64,
    /// Source pixels to surface pixels, including zoom.
    pub display_scale: f64,
    /// Source pixels to surface pixels at zoom 1.
    pub base_fit: f64,
}

/// Axis-aligned rectangle in render-surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Place the zoomed image centered on an `S×S` surface.
pub fn compute_display_transform(
    image: ImageSize,
    crop: &CropData,
    surface_size: f64,
) -> DisplayTransform {
    let base_fit = base_fit_scale(image, surface_size);
    let display_scale = base_fit * crop.scale;
    let display_width = image.width_f64() * display_scale;
    let display_height = image.height_f64() * display_scale;

    DisplayTransform {
        offset_x: (surface_size - display_width) / 2.0,
        offset_y: (surface_size - display_height) / 2.0,
        display_scale,
        base_fit,
    }
}

impl DisplayTransform {
    /// Where the crop window sits on the surface.
    ///
    /// The window's position follows the zoomed photo, but its size uses
    /// `base_fit` only: zooming changes the photo under the window, never
    /// the window itself.
    pub fn crop_screen_rect(&self, crop: &CropData) -> ScreenRect {
        ScreenRect {
            x: self.offset_x + (crop.x / crop.scale) * self.display_scale,
            y: self.offset_y + (crop.y / crop.scale) * self.display_scale,
            width: crop.width * self.base_fit,
            height: crop.height * self.base_fit,
        }
    }
}
