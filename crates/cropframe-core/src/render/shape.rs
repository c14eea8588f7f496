//! Path construction for the crop window outline.

use tiny_skia::{PathBuilder, Rect};

use crate::config::CropShape;

/// Cubic Bézier handle length for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

/// Append the outline of `shape` fitted to `rect` as one closed contour.
///
/// `radius` is only used by [`CropShape::RoundedSquare`] and is clamped to
/// half of the shorter side.
pub fn push_shape(builder: &mut PathBuilder, rect: Rect, shape: CropShape, radius: f32) {
    match shape {
        CropShape::Circle => builder.push_oval(rect),
        CropShape::Square | CropShape::Rect => builder.push_rect(rect),
        CropShape::RoundedSquare => push_rounded_rect(builder, rect, radius),
    }
}

fn push_rounded_rect(builder: &mut PathBuilder, rect: Rect, radius: f32) {
    let r = radius.clamp(0.0, rect.width().min(rect.height()) / 2.0);
    if r <= 0.0 {
        builder.push_rect(rect);
        return;
    }

    let (l, t, rt, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    let k = r * KAPPA;

    builder.move_to(l + r, t);
    builder.line_to(rt - r, t);
    builder.cubic_to(rt - r + k, t, rt, t + r - k, rt, t + r);
    builder.line_to(rt, b - r);
    builder.cubic_to(rt, b - r + k, rt - r + k, b, rt - r, b);
    builder.line_to(l + r, b);
    builder.cubic_to(l + r - k, b, l, b - r + k, l, b - r);
    builder.line_to(l, t + r);
    builder.cubic_to(l, t + r - k, l + r - k, t, l + r, t);
    builder.close();
}
