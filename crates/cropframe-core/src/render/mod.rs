//! Editor surface rendering.
//!
//! Draws one frame of the crop editor onto a square [`Surface`]: the photo
//! at its current zoom, a dark overlay everywhere outside the crop window,
//! and the window border with an optional safe-area guide.

mod shape;

pub use shape::push_shape;

use thiserror::Error;
use tiny_skia::{
    FillRule, FilterQuality, IntSize, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke,
    StrokeDash, Transform,
};

use crate::config::{Color, CropConfig};
use crate::decode::Raster;
use crate::geometry::{CropData, DisplayTransform, ScreenRect};

/// Dimming applied outside the crop window.
const OVERLAY: Color = Color::rgba(0, 0, 0, 128);
/// Crop window border width in surface pixels.
const BORDER_WIDTH: f32 = 2.0;
/// Safe-area guide size relative to the crop window.
const GUIDE_FRACTION: f32 = 0.9;
const GUIDE_WIDTH: f32 = 1.0;
const GUIDE_DASH: [f32; 2] = [6.0, 4.0];

/// Errors that can occur while preparing render targets.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The pixmap could not be allocated.
    #[error("Failed to allocate a {width}x{height} pixmap")]
    Allocation { width: u32, height: u32 },

    /// The source raster does not hold `width * height * 3` bytes.
    #[error("Render source is inconsistent: {0}")]
    InvalidSource(String),
}

/// Photo converted once into a premultiplied pixmap for repeated drawing.
#[derive(Debug, Clone)]
pub struct RenderSource {
    pixmap: Pixmap,
}

impl RenderSource {
    /// Expand an RGB raster to opaque RGBA.
    pub fn from_raster(raster: &Raster) -> Result<Self, RenderError> {
        if !raster.is_consistent() || raster.is_empty() {
            return Err(RenderError::InvalidSource(format!(
                "{}x{} with {} bytes",
                raster.width,
                raster.height,
                raster.pixels.len()
            )));
        }

        let allocation = RenderError::Allocation {
            width: raster.width,
            height: raster.height,
        };
        let size = IntSize::from_wh(raster.width, raster.height).ok_or(allocation)?;

        let mut rgba = Vec::with_capacity(raster.pixels.len() / 3 * 4);
        for px in raster.pixels.chunks_exact(3) {
            rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }

        // Opaque pixels are already premultiplied
        let pixmap = Pixmap::from_vec(rgba, size).ok_or(RenderError::Allocation {
            width: raster.width,
            height: raster.height,
        })?;
        Ok(Self { pixmap })
    }
}

/// Square render target the editor draws into.
#[derive(Debug, Clone)]
pub struct Surface {
    pixmap: Pixmap,
}

impl Surface {
    pub fn new(size: u32) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(size, size).ok_or(RenderError::Allocation {
            width: size,
            height: size,
        })?;
        Ok(Self { pixmap })
    }

    /// Edge length in pixels.
    pub fn size(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA bytes, row-major, ready for a canvas `ImageData`.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    /// Straight-alpha color at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }
}

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn to_skia_rect(rect: &ScreenRect) -> Option<Rect> {
    Rect::from_xywh(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
    )
}

/// Shrink `rect` around its center.
fn inset(rect: Rect, fraction: f32) -> Option<Rect> {
    let w = rect.width() * fraction;
    let h = rect.height() * fraction;
    Rect::from_xywh(
        rect.left() + (rect.width() - w) / 2.0,
        rect.top() + (rect.height() - h) / 2.0,
        w,
        h,
    )
}

/// Draw one editor frame.
///
/// `transform` must have been computed for `crop` on a surface of this size.
pub fn render(
    surface: &mut Surface,
    source: &RenderSource,
    crop: &CropData,
    transform: &DisplayTransform,
    config: &CropConfig,
) {
    let pixmap = &mut surface.pixmap;
    pixmap.fill(tiny_skia::Color::TRANSPARENT);

    let scale = transform.display_scale as f32;
    let image_transform = Transform::from_row(
        scale,
        0.0,
        0.0,
        scale,
        transform.offset_x as f32,
        transform.offset_y as f32,
    );
    let image_paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(
        0,
        0,
        source.pixmap.as_ref(),
        &image_paint,
        image_transform,
        None,
    );

    let full = pixmap.width() as f32;
    let Some(surface_rect) = Rect::from_xywh(0.0, 0.0, full, full) else {
        return;
    };

    let window = to_skia_rect(&transform.crop_screen_rect(crop));
    let output_width = f64::from(config.output_size().width);
    let radius = window
        .map(|w| (config.border_radius() * f64::from(w.width()) / output_width) as f32)
        .unwrap_or(0.0);

    // Surface rect plus window shape, filled even-odd, leaves the window clear
    let mut overlay = PathBuilder::new();
    overlay.push_rect(surface_rect);
    if let Some(window) = window {
        push_shape(&mut overlay, window, config.shape(), radius);
    }
    if let Some(path) = overlay.finish() {
        pixmap.fill_path(
            &path,
            &paint_for(OVERLAY),
            FillRule::EvenOdd,
            Transform::identity(),
            None,
        );
    }

    let Some(window) = window else {
        log::debug!("crop window {crop:?} has no visible area");
        return;
    };

    let safe_area = config.safe_area();
    let stroke_paint = paint_for(safe_area.color);

    let mut border = PathBuilder::new();
    push_shape(&mut border, window, config.shape(), radius);
    if let Some(path) = border.finish() {
        let stroke = Stroke {
            width: BORDER_WIDTH,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &stroke_paint, &stroke, Transform::identity(), None);
    }

    if !safe_area.show_guide {
        return;
    }
    let Some(guide_rect) = inset(window, GUIDE_FRACTION) else {
        return;
    };
    let mut guide = PathBuilder::new();
    push_shape(&mut guide, guide_rect, config.shape(), radius * GUIDE_FRACTION);
    if let Some(path) = guide.finish() {
        let stroke = Stroke {
            width: GUIDE_WIDTH,
            dash: StrokeDash::new(GUIDE_DASH.to_vec(), 0.0),
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &stroke_paint, &stroke, Transform::identity(), None);
    }
}
