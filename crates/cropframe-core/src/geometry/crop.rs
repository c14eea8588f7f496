//! Crop rectangle state and the gestures that mutate it.
//!
//! Every function here is pure: it takes the current [`CropData`] and
//! returns a new one. Out-of-bounds gestures are clamped, never rejected,
//! so every returned value satisfies the crop invariants:
//!
//! - `width / height == aspect_ratio`
//! - `0 <= x` and `x + width <= natural_width * scale` (same for y)
//! - `MIN_SCALE <= scale <= MAX_SCALE`

use serde::{Deserialize, Serialize};

use super::{
    base_fit_scale, DisplayTransform, INITIAL_CROP_FRACTION, MAX_SCALE, MIN_SCALE, ZOOM_STEP,
};
use crate::config::CropConfig;
use crate::decode::ImageSize;

/// Crop rectangle in image-pixel space at the current zoom scale.
///
/// These scalar fields are all a saved session keeps; they are enough to
/// reopen the editor on the exact same rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropData {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

/// Crop rectangle in true source pixels (zoom divided out).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropData {
    /// Map back to source-pixel coordinates.
    pub fn source_rect(&self) -> SourceRect {
        SourceRect {
            x: self.x / self.scale,
            y: self.y / self.scale,
            width: self.width / self.scale,
            height: self.height / self.scale,
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// True when every field is a finite number.
    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.width, self.height, self.scale]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Check the bounds invariant with a small relative tolerance.
    pub fn is_within(&self, image: ImageSize) -> bool {
        let max_w = image.width_f64() * self.scale;
        let max_h = image.height_f64() * self.scale;
        let eps = 1e-9 * max_w.max(max_h).max(1.0);
        self.x >= 0.0
            && self.y >= 0.0
            && self.x + self.width <= max_w + eps
            && self.y + self.height <= max_h + eps
            && (MIN_SCALE..=MAX_SCALE).contains(&self.scale)
    }

    fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Clamp one axis so `[value, value + size]` stays inside `[0, extent]`.
#[inline]
fn clamp_axis(value: f64, size: f64, extent: f64) -> f64 {
    value.clamp(0.0, (extent - size).max(0.0))
}

/// Largest `(width, height)` with the given aspect ratio that is no wider
/// than `width` and fits inside the natural image.
fn fit_crop_size(width: f64, aspect_ratio: f64, image: ImageSize) -> (f64, f64) {
    let width = width.min(image.width_f64());
    let height = width / aspect_ratio;
    if height > image.height_f64() {
        let height = image.height_f64();
        (height * aspect_ratio, height)
    } else {
        (width, height)
    }
}

/// Smallest scale at which a window of this size still fits the image.
fn min_scale_for(width: f64, height: f64, image: ImageSize) -> f64 {
    (width / image.width_f64())
        .max(height / image.height_f64())
        .clamp(MIN_SCALE, MAX_SCALE)
}

fn centered(width: f64, height: f64, scale: f64, image: ImageSize) -> CropData {
    CropData {
        x: ((image.width_f64() * scale - width) / 2.0).max(0.0),
        y: ((image.height_f64() * scale - height) / 2.0).max(0.0),
        width,
        height,
        scale,
    }
}

/// Initial crop for a freshly opened session.
///
/// The window covers 40% of the render surface edge, converted back into
/// image pixels, and is centered on the photo at zoom 1. Images too small
/// for that window get the largest window that fits instead.
pub fn initialize_crop(image: ImageSize, config: &CropConfig, surface_size: f64) -> CropData {
    let base_fit = base_fit_scale(image, surface_size);
    let wanted = INITIAL_CROP_FRACTION * surface_size / base_fit;
    let (width, height) = fit_crop_size(wanted, config.aspect_ratio(), image);
    let crop = centered(width, height, 1.0, image);

    log::debug!(
        "initialized crop {:.1}x{:.1} at ({:.1}, {:.1}) for {}x{} image",
        crop.width,
        crop.height,
        crop.x,
        crop.y,
        image.natural_width,
        image.natural_height
    );
    crop
}

/// Back to the initial crop, discarding any drag or zoom history.
pub fn reset(config: &CropConfig, image: ImageSize, surface_size: f64) -> CropData {
    initialize_crop(image, config, surface_size)
}

/// Move the crop window by a pointer delta measured in surface pixels.
///
/// Only the position changes. Each axis is clamped independently, so a
/// diagonal drag past one edge still slides along the other.
pub fn apply_drag(
    crop: &CropData,
    delta_x: f64,
    delta_y: f64,
    transform: &DisplayTransform,
    image: ImageSize,
) -> CropData {
    let to_crop = |delta: f64| {
        if delta.is_finite() {
            delta / transform.display_scale * crop.scale
        } else {
            0.0
        }
    };

    CropData {
        x: clamp_axis(
            crop.x + to_crop(delta_x),
            crop.width,
            image.width_f64() * crop.scale,
        ),
        y: clamp_axis(
            crop.y + to_crop(delta_y),
            crop.height,
            image.height_f64() * crop.scale,
        ),
        ..*crop
    }
}

/// Zoom the photo one step under the fixed-size crop window.
///
/// The window's center is carried over to the new scale and then clamped.
/// Zooming out stops at the scale where the window would no longer fit.
pub fn apply_zoom(crop: &CropData, zoom_in: bool, image: ImageSize) -> CropData {
    let step = if zoom_in { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
    let new_scale = (crop.scale * step)
        .clamp(MIN_SCALE, MAX_SCALE)
        .max(min_scale_for(crop.width, crop.height, image));

    let factor = new_scale / crop.scale;
    let (cx, cy) = crop.center();
    let zoomed = CropData {
        x: clamp_axis(
            cx * factor - crop.width / 2.0,
            crop.width,
            image.width_f64() * new_scale,
        ),
        y: clamp_axis(
            cy * factor - crop.height / 2.0,
            crop.height,
            image.height_f64() * new_scale,
        ),
        scale: new_scale,
        ..*crop
    };

    log::debug!("zoom {} -> scale {:.3}", if zoom_in { "in" } else { "out" }, new_scale);
    zoomed
}

/// Reopen a previously saved crop against the current image and config.
///
/// Saved data comes from storage and may not match the image it is now
/// applied to, so it is brought back inside the invariants: scale into
/// range, size re-derived from the saved width with the config's aspect
/// ratio, position clamped. Unusable data falls back to the initial crop.
pub fn restore(
    saved: &CropData,
    config: &CropConfig,
    image: ImageSize,
    surface_size: f64,
) -> CropData {
    if !saved.is_finite() || saved.width <= 0.0 || saved.height <= 0.0 || saved.scale <= 0.0 {
        log::warn!("saved crop {saved:?} is unusable, starting from the default crop");
        return initialize_crop(image, config, surface_size);
    }

    let (width, height) = fit_crop_size(saved.width, config.aspect_ratio(), image);
    let scale = saved
        .scale
        .clamp(MIN_SCALE, MAX_SCALE)
        .max(min_scale_for(width, height, image));

    CropData {
        x: clamp_axis(saved.x, width, image.width_f64() * scale),
        y: clamp_axis(saved.y, height, image.height_f64() * scale),
        width,
        height,
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CropShape;
    use crate::geometry::{compute_display_transform, DEFAULT_SURFACE_SIZE};

    const S: f64 = DEFAULT_SURFACE_SIZE;

    fn square_config() -> CropConfig {
        CropConfig::new(1.0, CropShape::Circle, 400).unwrap()
    }

    fn crop(x: f64, y: f64, width: f64, height: f64, scale: f64) -> CropData {
        CropData {
            x,
            y,
            width,
            height,
            scale,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_initialize_landscape_square_crop() {
        let image = ImageSize::new(2000, 1500);
        let c = initialize_crop(image, &square_config(), S);

        // base fit = 0.2; 40% of the 400 px surface is 160 px = 800 image px
        assert!(approx(c.width, 800.0));
        assert!(approx(c.height, 800.0));
        assert!(approx(c.x, 600.0));
        assert!(approx(c.y, 350.0));
        assert_eq!(c.scale, 1.0);
        assert!(c.is_within(image));
    }

    #[test]
    fn test_initialize_follows_aspect_ratio() {
        let image = ImageSize::new(4000, 3000);
        let config = CropConfig::new(0.75, CropShape::Rect, 400).unwrap();
        let c = initialize_crop(image, &config, S);

        assert!(approx(c.aspect_ratio(), 0.75));
        assert!(c.is_within(image));
    }

    #[test]
    fn test_initialize_clamps_to_small_dimension() {
        // Wide strip: the wanted 1000 px square cannot fit 200 px of height
        let image = ImageSize::new(4000, 200);
        let c = initialize_crop(image, &square_config(), S);

        assert!(approx(c.height, 200.0));
        assert!(approx(c.width, 200.0));
        assert_eq!(c.y, 0.0);
        assert!(c.is_within(image));
    }

    #[test]
    fn test_initialize_one_pixel_image() {
        for (w, h) in [(1, 1), (1, 800), (800, 1)] {
            let image = ImageSize::new(w, h);
            let c = initialize_crop(image, &square_config(), S);
            assert!(c.width > 0.0 && c.height > 0.0);
            assert!(approx(c.aspect_ratio(), 1.0));
            assert!(c.is_within(image), "{w}x{h}: {c:?}");
        }
    }

    #[test]
    fn test_reset_matches_initialize() {
        let image = ImageSize::new(1600, 900);
        let config = square_config();
        let start = initialize_crop(image, &config, S);
        let t = compute_display_transform(image, &start, S);
        let moved = apply_zoom(&apply_drag(&start, 40.0, -25.0, &t, image), true, image);

        assert_ne!(moved, start);
        assert_eq!(reset(&config, image, S), start);
    }

    #[test]
    fn test_drag_moves_by_base_fit() {
        let image = ImageSize::new(1000, 1000);
        let c = crop(300.0, 300.0, 200.0, 200.0, 1.0);
        let t = compute_display_transform(image, &c, S);
        let moved = apply_drag(&c, 40.0, -20.0, &t, image);

        // base fit 0.4: 40 surface px = 100 image px
        assert!(approx(moved.x, 400.0));
        assert!(approx(moved.y, 250.0));
        assert_eq!(moved.width, c.width);
        assert_eq!(moved.scale, c.scale);
    }

    #[test]
    fn test_drag_at_zoom_moves_in_scaled_space() {
        let image = ImageSize::new(1000, 1000);
        let c = crop(600.0, 600.0, 200.0, 200.0, 2.0);
        let t = compute_display_transform(image, &c, S);
        let moved = apply_drag(&c, 40.0, 0.0, &t, image);

        // display scale 0.8: 40 / 0.8 * 2 = 100
        assert!(approx(moved.x, 700.0));
    }

    #[test]
    fn test_drag_clamps_each_edge() {
        let image = ImageSize::new(1000, 800);
        let c = crop(100.0, 100.0, 300.0, 300.0, 1.0);
        let t = compute_display_transform(image, &c, S);

        let far = apply_drag(&c, 1e6, 1e6, &t, image);
        assert_eq!(far.x, 700.0);
        assert_eq!(far.y, 500.0);

        let near = apply_drag(&c, -1e6, -1e6, &t, image);
        assert_eq!(near.x, 0.0);
        assert_eq!(near.y, 0.0);
    }

    #[test]
    fn test_drag_axes_clamp_independently() {
        let image = ImageSize::new(1000, 1000);
        let c = crop(100.0, 100.0, 300.0, 300.0, 1.0);
        let t = compute_display_transform(image, &c, S);
        let moved = apply_drag(&c, -1e6, 20.0, &t, image);

        assert_eq!(moved.x, 0.0);
        assert!(approx(moved.y, 150.0));
    }

    #[test]
    fn test_drag_ignores_non_finite_delta() {
        let image = ImageSize::new(1000, 1000);
        let c = crop(100.0, 100.0, 300.0, 300.0, 1.0);
        let t = compute_display_transform(image, &c, S);
        assert_eq!(apply_drag(&c, f64::NAN, f64::INFINITY, &t, image), c);
    }

    #[test]
    fn test_zoom_in_keeps_window_inside() {
        let image = ImageSize::new(1000, 1000);
        let c = crop(0.0, 0.0, 500.0, 500.0, 1.0);
        let z = apply_zoom(&c, true, image);

        assert!(approx(z.scale, 1.2));
        assert!(z.x + z.width <= 1200.0);
        assert!(z.y + z.height <= 1200.0);
        // center 250 * 1.2 = 300, minus half the window
        assert!(approx(z.x, 50.0));
        assert_eq!(z.width, 500.0);
        assert_eq!(z.height, 500.0);
    }

    #[test]
    fn test_zoom_clamps_at_limits() {
        let image = ImageSize::new(1000, 1000);
        let mut c = crop(0.0, 0.0, 100.0, 100.0, 1.0);
        for _ in 0..20 {
            c = apply_zoom(&c, true, image);
        }
        assert_eq!(c.scale, MAX_SCALE);

        for _ in 0..40 {
            c = apply_zoom(&c, false, image);
        }
        assert_eq!(c.scale, MIN_SCALE);
        assert!(c.is_within(image));
    }

    #[test]
    fn test_zoom_out_stops_where_window_fits() {
        let image = ImageSize::new(1000, 1000);
        let c = crop(100.0, 100.0, 800.0, 800.0, 1.0);
        let first = apply_zoom(&c, false, image);
        assert!(approx(first.scale, 1.0 / ZOOM_STEP));

        // 1/1.2^2 would leave the 800 px window wider than the image
        let second = apply_zoom(&first, false, image);
        assert!(approx(second.scale, 0.8));
        assert!(second.is_within(image));
        assert_eq!(apply_zoom(&second, false, image).scale, second.scale);
    }

    #[test]
    fn test_zoom_round_trip_restores_scale() {
        let image = ImageSize::new(1200, 900);
        let c = initialize_crop(image, &square_config(), S);
        let back = apply_zoom(&apply_zoom(&c, true, image), false, image);
        assert!(approx(back.scale, c.scale));
    }

    #[test]
    fn test_restore_keeps_valid_saved_crop() {
        let image = ImageSize::new(1000, 1000);
        let saved = crop(200.0, 300.0, 400.0, 400.0, 1.5);
        assert_eq!(restore(&saved, &square_config(), image, S), saved);
    }

    #[test]
    fn test_restore_clamps_foreign_data() {
        let image = ImageSize::new(500, 400);
        let saved = crop(9000.0, -50.0, 2000.0, 2000.0, 7.0);
        let r = restore(&saved, &square_config(), image, S);

        assert_eq!(r.scale, MAX_SCALE);
        assert!(approx(r.width, 400.0));
        assert!(approx(r.aspect_ratio(), 1.0));
        assert!(r.is_within(image));
        assert_eq!(r.y, 0.0);
    }

    #[test]
    fn test_restore_reapplies_config_aspect() {
        let image = ImageSize::new(1000, 1000);
        let config = CropConfig::new(2.0, CropShape::Rect, 400).unwrap();
        let r = restore(&crop(0.0, 0.0, 400.0, 400.0, 1.0), &config, image, S);
        assert!(approx(r.aspect_ratio(), 2.0));
        assert!(approx(r.height, 200.0));
    }

    #[test]
    fn test_restore_rejects_garbage() {
        let image = ImageSize::new(1000, 1000);
        let config = square_config();
        let garbage = crop(f64::NAN, 0.0, 10.0, 10.0, 1.0);
        assert_eq!(
            restore(&garbage, &config, image, S),
            initialize_crop(image, &config, S)
        );
        let empty = crop(0.0, 0.0, 0.0, 0.0, 1.0);
        assert_eq!(
            restore(&empty, &config, image, S),
            initialize_crop(image, &config, S)
        );
    }

    #[test]
    fn test_source_rect_divides_out_zoom() {
        let c = crop(300.0, 150.0, 600.0, 300.0, 1.5);
        let src = c.source_rect();
        assert!(approx(src.x, 200.0));
        assert!(approx(src.y, 100.0));
        assert!(approx(src.width, 400.0));
        assert!(approx(src.height, 200.0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
