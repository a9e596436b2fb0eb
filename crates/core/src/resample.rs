//! Nearest-neighbour rescaling.

use crate::error::{Error, Result};
use crate::raster::RasterImage;

/// Rescale `image` by `scale` with nearest-neighbour sampling.
///
/// The new dimensions are `trunc(width * scale)` and `trunc(height * scale)`,
/// never below 1. Destination pixel `(x, y)` copies source pixel
/// `(trunc(x / scale), trunc(y / scale))`, clamped to the source extent.
/// No interpolation is done, so downscaling drops pixels and can alias.
///
/// # Errors
/// `Error::InvalidArgument` if `scale` is not a positive finite number.
pub fn resize_nearest(image: &RasterImage, scale: f32) -> Result<RasterImage> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "scale must be positive, got {scale}"
        )));
    }

    let width = ((image.width() as f32 * scale) as i32).max(1);
    let height = ((image.height() as f32 * scale) as i32).max(1);
    let mut resized = RasterImage::new(width, height)?;

    for x in 0..width {
        let src_x = ((x as f32 / scale) as i32).min(image.width() - 1);
        for y in 0..height {
            let src_y = ((y as f32 / scale) as i32).min(image.height() - 1);
            resized.set(x, y, image.get(src_x, src_y)?)?;
        }
    }

    Ok(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Pixel;

    fn checkerboard(width: i32, height: i32) -> RasterImage {
        let mut image = RasterImage::new(width, height).unwrap();
        for x in 0..width {
            for y in 0..height {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                image.set(x, y, Pixel::new(v, x as u8, y as u8)).unwrap();
            }
        }
        image
    }

    #[test]
    fn test_half_scale_samples_even_pixels() {
        let source = checkerboard(8, 6);
        let half = resize_nearest(&source, 0.5).unwrap();
        assert_eq!((half.width(), half.height()), (4, 3));

        for x in 0..4 {
            for y in 0..3 {
                assert_eq!(half.get(x, y).unwrap(), source.get(x * 2, y * 2).unwrap());
            }
        }
    }

    #[test]
    fn test_upscale_repeats_pixels() {
        let source = checkerboard(2, 2);
        let double = resize_nearest(&source, 2.0).unwrap();
        assert_eq!((double.width(), double.height()), (4, 4));
        assert_eq!(double.get(1, 1).unwrap(), source.get(0, 0).unwrap());
        assert_eq!(double.get(3, 2).unwrap(), source.get(1, 1).unwrap());
    }

    #[test]
    fn test_tiny_scale_keeps_one_pixel() {
        let source = checkerboard(3, 3);
        let tiny = resize_nearest(&source, 0.01).unwrap();
        assert_eq!((tiny.width(), tiny.height()), (1, 1));
        assert_eq!(tiny.get(0, 0).unwrap(), source.get(0, 0).unwrap());
    }

    #[test]
    fn test_rejects_bad_scale() {
        let source = checkerboard(2, 2);
        for scale in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                resize_nearest(&source, scale),
                Err(Error::InvalidArgument(_))
            ));
        }
    }
}
