//! Sample image generation for testing.
//!
//! When no input image is given, we generate one with interesting
//! compression characteristics: a mix of flat, smooth and noisy regions.
//!
//! # Design
//!
//! The image is split into horizontal bands, each filled with:
//! - a flat color (highly compressible)
//! - a gradient (moderately compressible, few distinct values per channel)
//! - a repeating tile pattern
//! - random noise (incompressible)
//!
//! This makes the compression behavior visible in metrics.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rastercodec_core::{Pixel, RasterImage, Result};

/// Band height in rows.
const BAND: i32 = 32;

/// Generate a sample image with mixed compressibility.
///
/// # Arguments
/// - `seed`: random seed for determinism
/// - `width`, `height`: image dimensions (must be positive)
pub fn generate_sample_image(seed: u64, width: i32, height: i32) -> Result<RasterImage> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut image = RasterImage::new(width, height)?;

    let mut top = 0;
    while top < height {
        let bottom = (top + BAND).min(height);
        let band_type: u8 = rng.gen_range(0..10);

        match band_type {
            // 30% flat color
            0..=2 => {
                let color = random_pixel(&mut rng);
                fill(&mut image, top, bottom, |_, _| color)?;
            }

            // 30% gradient
            3..=5 => {
                let base = random_pixel(&mut rng);
                fill(&mut image, top, bottom, |x, y| {
                    Pixel::new(
                        base.red.wrapping_add((x * 255 / width) as u8),
                        base.green.wrapping_add(((y - top) * 8) as u8),
                        base.blue,
                    )
                })?;
            }

            // 20% repeating tile
            6..=7 => {
                let tile = generate_tile(&mut rng);
                fill(&mut image, top, bottom, |x, y| tile[((x % 4) + (y % 4) * 4) as usize])?;
            }

            // 20% noise
            _ => {
                for y in top..bottom {
                    for x in 0..width {
                        image.set(x, y, random_pixel(&mut rng))?;
                    }
                }
            }
        }

        top = bottom;
    }

    Ok(image)
}

fn fill(
    image: &mut RasterImage,
    top: i32,
    bottom: i32,
    mut color: impl FnMut(i32, i32) -> Pixel,
) -> Result<()> {
    for y in top..bottom {
        for x in 0..image.width() {
            image.set(x, y, color(x, y))?;
        }
    }
    Ok(())
}

fn random_pixel(rng: &mut ChaCha8Rng) -> Pixel {
    Pixel::new(rng.gen(), rng.gen(), rng.gen())
}

/// Generate a 4x4 tile of random colors.
fn generate_tile(rng: &mut ChaCha8Rng) -> [Pixel; 16] {
    std::array::from_fn(|_| random_pixel(rng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_sample_image() {
        let image = generate_sample_image(42, 50, 70).unwrap();
        assert_eq!((image.width(), image.height()), (50, 70));
        assert_eq!(image.pixel_bytes().len(), 70 * image.stride());
    }

    #[test]
    fn test_determinism() {
        let a = generate_sample_image(12345, 64, 64).unwrap();
        let b = generate_sample_image(12345, 64, 64).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds() {
        let a = generate_sample_image(1, 64, 128).unwrap();
        let b = generate_sample_image(2, 64, 128).unwrap();
        assert_ne!(a.pixel_bytes(), b.pixel_bytes());
    }

    #[test]
    fn test_various_sizes() {
        for (w, h) in [(1, 1), (3, 100), (100, 3), (33, 65)] {
            let image = generate_sample_image(999, w, h).unwrap();
            assert_eq!((image.width(), image.height()), (w, h));
        }
        assert!(generate_sample_image(1, 0, 5).is_err());
    }
}
