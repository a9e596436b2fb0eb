//! Hiding one image in the low nibbles of another.
//!
//! Every channel byte of the stego image keeps the cover's high nibble and
//! carries the secret's high nibble in its low nibble. Extraction promotes
//! that nibble back to the high position, so the recovered image has only
//! 16 levels per channel. The low nibble of the secret is lost by
//! construction.

use log::{debug, warn};

use crate::bitio::{fuse_high_nibbles, promote_low_nibble};
use crate::error::Result;
use crate::raster::{Pixel, RasterImage};
use crate::resample::resize_nearest;

fn fuse(cover: Pixel, hidden: Pixel) -> Pixel {
    Pixel::new(
        fuse_high_nibbles(cover.red, hidden.red),
        fuse_high_nibbles(cover.green, hidden.green),
        fuse_high_nibbles(cover.blue, hidden.blue),
    )
}

fn split(stego: Pixel) -> Pixel {
    Pixel::new(
        promote_low_nibble(stego.red),
        promote_low_nibble(stego.green),
        promote_low_nibble(stego.blue),
    )
}

/// Embed `hidden` into a copy of `cover`.
///
/// A secret larger than the cover in either axis is first shrunk with
/// nearest-neighbour sampling by the smaller of the two axis ratios. Cover
/// pixels outside the secret's extent are copied unchanged.
pub fn hide(cover: &RasterImage, hidden: &RasterImage) -> Result<RasterImage> {
    let mut stego = cover.copy()?;

    let resized;
    let hidden = if hidden.width() > cover.width() || hidden.height() > cover.height() {
        let scale = f32::min(
            cover.width() as f32 / hidden.width() as f32,
            cover.height() as f32 / hidden.height() as f32,
        );
        warn!(
            "secret {}x{} exceeds cover {}x{}, downscaling by {scale:.3}",
            hidden.width(),
            hidden.height(),
            cover.width(),
            cover.height()
        );
        resized = resize_nearest(hidden, scale)?;
        &resized
    } else {
        hidden
    };

    let width = hidden.width().min(cover.width());
    let height = hidden.height().min(cover.height());
    for x in 0..width {
        for y in 0..height {
            let pixel = fuse(stego.get(x, y)?, hidden.get(x, y)?);
            stego.set(x, y, pixel)?;
        }
    }

    debug!("embedded {width}x{height} secret");
    Ok(stego)
}

/// Recover the embedded image at 4 bits per channel.
pub fn extract(stego: &RasterImage) -> Result<RasterImage> {
    let mut recovered = RasterImage::new(stego.width(), stego.height())?;
    for x in 0..stego.width() {
        for y in 0..stego.height() {
            recovered.set(x, y, split(stego.get(x, y)?))?;
        }
    }
    Ok(recovered)
}
