//! Point samplers over an RGB [`Raster`].
//!
//! Coordinates are in pixel-center space: `(0.0, 0.0)` is the center of the
//! top-left pixel. Every sampler clamps its coordinates (and any kernel taps)
//! to the raster, so edges extend instead of fading to black.

use crate::decode::Raster;

/// Resampling filter used when extracting the output raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationFilter {
    /// Closest source pixel. Blocky, but exact for integer scale factors.
    Nearest,
    /// Weighted average of the 4 surrounding pixels.
    #[default]
    Bilinear,
    /// Windowed sinc over a 6x6 neighborhood. Sharpest, slowest.
    Lanczos3,
}

impl InterpolationFilter {
    pub(crate) fn sample(self, image: &Raster, x: f64, y: f64) -> [f64; 3] {
        match self {
            InterpolationFilter::Nearest => sample_nearest(image, x, y),
            InterpolationFilter::Bilinear => sample_bilinear(image, x, y),
            InterpolationFilter::Lanczos3 => sample_lanczos3(image, x, y),
        }
    }
}

#[inline]
fn texel(image: &Raster, px: i64, py: i64) -> [f64; 3] {
    let px = px.clamp(0, i64::from(image.width) - 1) as u32;
    let py = py.clamp(0, i64::from(image.height) - 1) as u32;
    image
        .pixel(px, py)
        .map_or([0.0; 3], |rgb| rgb.map(f64::from))
}

fn sample_nearest(image: &Raster, x: f64, y: f64) -> [f64; 3] {
    texel(image, x.round() as i64, y.round() as i64)
}

fn sample_bilinear(image: &Raster, x: f64, y: f64) -> [f64; 3] {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = texel(image, x0, y0);
    let p10 = texel(image, x0 + 1, y0);
    let p01 = texel(image, x0, y0 + 1);
    let p11 = texel(image, x0 + 1, y0 + 1);

    let mut out = [0.0; 3];
    for (i, v) in out.iter_mut().enumerate() {
        *v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }
    out
}

fn sample_lanczos3(image: &Raster, x: f64, y: f64) -> [f64; 3] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        let wy = lanczos_weight(y - (y0 + ky) as f64, 3.0);
        if wy == 0.0 {
            continue;
        }
        for kx in -2..=3 {
            let weight = lanczos_weight(x - (x0 + kx) as f64, 3.0) * wy;
            let pixel = texel(image, x0 + kx, y0 + ky);
            for (acc, value) in sum.iter_mut().zip(pixel) {
                *acc += value * weight;
            }
            weight_sum += weight;
        }
    }

    if weight_sum.abs() < f64::EPSILON {
        return sample_bilinear(image, x, y);
    }
    sum.map(|v| v / weight_sum)
}

/// `sinc(x) * sinc(x / a)` for `|x| < a`, zero outside.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    (a * pi_x.sin() * (pi_x / a).sin()) / (pi_x * pi_x)
}
