//! Output raster extraction.
//!
//! Maps every output pixel back into the source rectangle described by a
//! [`CropData`] and resamples it. The output is always exactly the requested
//! size; the aspect ratio of the crop is trusted, never corrected.

use super::{ImageProcessingError, InterpolationFilter};
use crate::config::OutputSize;
use crate::decode::Raster;
use crate::geometry::CropData;

/// Upper bound on sub-samples per axis when downscaling.
const MAX_SUPERSAMPLE: u32 = 4;

/// Sub-samples per axis needed for a `src`-to-`dst` reduction.
#[inline]
fn supersample_factor(src: f64, dst: u32) -> u32 {
    let ratio = src / f64::from(dst);
    if ratio <= 1.0 {
        1
    } else {
        (ratio.ceil() as u32).clamp(1, MAX_SUPERSAMPLE)
    }
}

/// Extract the crop window into a `target`-sized RGB raster.
///
/// The source rectangle is the crop divided by its zoom scale. When the
/// rectangle is larger than the target, each output pixel averages a grid
/// of sub-samples so thin detail does not alias.
///
/// The call is atomic: it either returns a complete raster or an error,
/// and never touches `image`.
pub fn apply_crop(
    image: &Raster,
    crop: &CropData,
    target: OutputSize,
    filter: InterpolationFilter,
) -> Result<Raster, ImageProcessingError> {
    if target.width == 0 || target.height == 0 {
        return Err(ImageProcessingError::InvalidTargetSize {
            width: target.width,
            height: target.height,
        });
    }
    if image.is_empty() || !image.is_consistent() {
        return Err(ImageProcessingError::InvalidSource {
            width: image.width,
            height: image.height,
            len: image.pixels.len(),
        });
    }
    if !crop.is_finite() || crop.scale <= 0.0 || crop.width <= 0.0 || crop.height <= 0.0 {
        return Err(ImageProcessingError::InvalidCrop(*crop));
    }

    let src = crop.source_rect();
    let step_x = src.width / f64::from(target.width);
    let step_y = src.height / f64::from(target.height);
    let kx = supersample_factor(src.width, target.width);
    let ky = supersample_factor(src.height, target.height);

    let len = (target.width as usize)
        .checked_mul(target.height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or(ImageProcessingError::Allocation { bytes: usize::MAX })?;
    let mut output = Vec::new();
    output
        .try_reserve_exact(len)
        .map_err(|_| ImageProcessingError::Allocation { bytes: len })?;

    let max_x = f64::from(image.width - 1);
    let max_y = f64::from(image.height - 1);
    let samples = f64::from(kx * ky);

    for dst_y in 0..target.height {
        for dst_x in 0..target.width {
            let mut acc = [0.0f64; 3];
            for sy in 0..ky {
                let oy = f64::from(dst_y) + (f64::from(sy) + 0.5) / f64::from(ky);
                let y = (src.y + oy * step_y - 0.5).clamp(0.0, max_y);
                for sx in 0..kx {
                    let ox = f64::from(dst_x) + (f64::from(sx) + 0.5) / f64::from(kx);
                    let x = (src.x + ox * step_x - 0.5).clamp(0.0, max_x);
                    let value = filter.sample(image, x, y);
                    for (a, v) in acc.iter_mut().zip(value) {
                        *a += v;
                    }
                }
            }
            output.extend(acc.map(|v| (v / samples).clamp(0.0, 255.0).round() as u8));
        }
    }

    log::debug!(
        "extracted {}x{} from source ({:.1}, {:.1}) {:.1}x{:.1} with {:?} ({}x{} samples)",
        target.width,
        target.height,
        src.x,
        src.y,
        src.width,
        src.height,
        filter,
        kx,
        ky
    );

    Ok(Raster::new(target.width, target.height, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Black 1000×1000 image with a white square covering `[100, 400)` on both axes.
    fn framed_square() -> Raster {
        let mut pixels = vec![0u8; 1000 * 1000 * 3];
        for y in 100..400 {
            for x in 100..400 {
                let idx = (y * 1000 + x) * 3;
                pixels[idx..idx + 3].copy_from_slice(&[255, 255, 255]);
            }
        }
        Raster::new(1000, 1000, pixels)
    }

    fn target(width: u32, height: u32) -> OutputSize {
        OutputSize { width, height }
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

    #[test]
    fn test_extracts_exact_source_region() {
        let out = apply_crop(
            &framed_square(),
            &crop(100.0, 100.0, 300.0, 300.0, 1.0),
            target(150, 150),
            InterpolationFilter::Bilinear,
        )
        .unwrap();

        assert_eq!((out.width, out.height), (150, 150));
        assert_eq!(out.pixels.len(), 150 * 150 * 3);
        // Every sample lands inside the white square, none bleeds in from the frame
        assert!(out.pixels.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_zoom_scale_is_divided_out() {
        // Same source region as above, expressed at zoom 2
        let out = apply_crop(
            &framed_square(),
            &crop(200.0, 200.0, 600.0, 600.0, 2.0),
            target(150, 150),
            InterpolationFilter::Nearest,
        )
        .unwrap();

        assert!(out.pixels.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_output_matches_target_even_when_aspect_differs() {
        let out = apply_crop(
            &framed_square(),
            &crop(0.0, 0.0, 500.0, 500.0, 1.0),
            target(300, 100),
            InterpolationFilter::Bilinear,
        )
        .unwrap();
        assert_eq!((out.width, out.height), (300, 100));
        assert!(out.is_consistent());
    }

    #[test]
    fn test_upscaling_small_source() {
        let image = Raster::new(2, 2, vec![0, 0, 0, 255, 255, 255, 255, 255, 255, 0, 0, 0]);
        for filter in [
            InterpolationFilter::Nearest,
            InterpolationFilter::Bilinear,
            InterpolationFilter::Lanczos3,
        ] {
            let out = apply_crop(&image, &crop(0.0, 0.0, 2.0, 2.0, 1.0), target(8, 8), filter)
                .unwrap();
            assert_eq!(out.pixels.len(), 8 * 8 * 3, "{filter:?}");
        }
    }

    #[test]
    fn test_downscale_averages_fine_detail() {
        // 1-pixel stripes collapse to mid-gray instead of aliasing to one color
        let mut pixels = Vec::with_capacity(64 * 64 * 3);
        for _y in 0..64 {
            for x in 0..64 {
                let v = if x % 2 == 0 { 0 } else { 255 };
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        let image = Raster::new(64, 64, pixels);

        let out = apply_crop(
            &image,
            &crop(0.0, 0.0, 64.0, 64.0, 1.0),
            target(16, 16),
            InterpolationFilter::Nearest,
        )
        .unwrap();
        assert!(out.pixels.iter().all(|&v| (120..=135).contains(&v)));
    }

    #[test]
    fn test_supersample_factor() {
        assert_eq!(supersample_factor(100.0, 100), 1);
        assert_eq!(supersample_factor(50.0, 100), 1);
        assert_eq!(supersample_factor(300.0, 150), 2);
        assert_eq!(supersample_factor(301.0, 150), 3);
        assert_eq!(supersample_factor(10_000.0, 10), 4);
    }

    #[test]
    fn test_rejects_zero_target() {
        let result = apply_crop(
            &framed_square(),
            &crop(0.0, 0.0, 10.0, 10.0, 1.0),
            target(0, 10),
            InterpolationFilter::Bilinear,
        );
        assert!(matches!(
            result,
            Err(ImageProcessingError::InvalidTargetSize { width: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_inconsistent_source() {
        let image = Raster {
            width: 10,
            height: 10,
            pixels: vec![0; 12],
        };
        let result = apply_crop(
            &image,
            &crop(0.0, 0.0, 5.0, 5.0, 1.0),
            target(5, 5),
            InterpolationFilter::Bilinear,
        );
        assert!(matches!(
            result,
            Err(ImageProcessingError::InvalidSource { len: 12, .. })
        ));
    }

    #[test]
    fn test_rejects_degenerate_crops() {
        let image = framed_square();
        for bad in [
            crop(f64::NAN, 0.0, 10.0, 10.0, 1.0),
            crop(0.0, 0.0, 0.0, 10.0, 1.0),
            crop(0.0, 0.0, 10.0, -1.0, 1.0),
            crop(0.0, 0.0, 10.0, 10.0, 0.0),
            crop(0.0, 0.0, f64::INFINITY, 10.0, 1.0),
        ] {
            let result = apply_crop(&image, &bad, target(10, 10), InterpolationFilter::Bilinear);
            assert!(
                matches!(result, Err(ImageProcessingError::InvalidCrop(_))),
                "{bad:?}"
            );
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
