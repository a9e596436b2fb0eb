//! Integration tests for the full codec pipeline.
//!
//! These tests verify end-to-end behavior through the public API:
//! create -> draw -> save -> load -> compress -> decompress -> save, and
//! hide -> save -> load -> extract, with verification against the input.

use rastercodec_core::{
    framing::{compress_framed, decompress_framed},
    huffman::{self, histogram},
    stego, Pixel, RasterImage,
};

/// Draw a deterministic gradient with a few flat regions.
fn gradient(width: i32, height: i32) -> RasterImage {
    let mut image = RasterImage::new(width, height).expect("valid dimensions");
    for x in 0..width {
        for y in 0..height {
            let pixel = if x < width / 4 {
                Pixel::new(0, 0, 0)
            } else {
                Pixel::new((x * 255 / width) as u8, (y * 255 / height) as u8, 128)
            };
            image.set(x, y, pixel).expect("pixel in range");
        }
    }
    image
}

/// Blank image survives a save/load cycle with zero pixels and its size.
#[test]
fn test_blank_container_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = RasterImage::new(7, 3).unwrap().save("blank", dir.path()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 54 + 3 * 24);
    assert_eq!(&bytes[0..2], b"BM");

    let loaded = RasterImage::load(&path).unwrap();
    assert_eq!((loaded.width(), loaded.height()), (7, 3));
    assert_eq!(loaded.pixel_bytes().len(), 3 * 24);
    assert!(loaded.pixel_bytes().iter().all(|&b| b == 0));
}

/// Compress and decompress a loaded image, then reload the saved result.
#[test]
fn test_image_compression_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let source = gradient(33, 17);
    let path = source.save("gradient", dir.path()).unwrap();

    let mut image = RasterImage::load(&path).unwrap();
    let raw_len = image.pixel_bytes().len();

    // Step 1: compress in place; tree stays with the caller
    let tree = image.compress().expect("compression failed");
    assert!(image.pixel_bytes().len() < raw_len);

    // Step 2: decompress with the same tree
    image.decompress(&tree).expect("decompression failed");
    assert!(image.pixel_bytes().len() >= raw_len);
    assert_eq!(&image.pixel_bytes()[..raw_len], source.pixel_bytes());

    // Step 3: saved output loads back to the original, padding ignored
    let out = image.save("gradient_Compressed_Decompressed", dir.path()).unwrap();
    let reloaded = RasterImage::load(&out).unwrap();
    assert_eq!(reloaded.pixel_bytes(), source.pixel_bytes());
    assert_eq!(reloaded.get(20, 10).unwrap(), source.get(20, 10).unwrap());
}

/// Every occurring symbol gets exactly one code, and codes are prefix-free.
#[test]
fn test_code_table_properties_on_pixels() {
    let image = gradient(40, 40);
    let freqs = histogram(image.pixel_bytes());
    let (_, tree) = huffman::compress(image.pixel_bytes()).unwrap();
    let table = tree.code_table();

    assert_eq!(table.len(), freqs.iter().filter(|&&f| f > 0).count());
    let codes: Vec<_> = table.iter().collect();
    for (i, (_, a)) in codes.iter().enumerate() {
        for (_, b) in &codes[i + 1..] {
            assert!(!b.starts_with(a) && !a.starts_with(b));
        }
    }
}

/// A one-color image exercises the single-leaf tree.
#[test]
fn test_single_color_image() {
    // 8 pixels -> 24 one-bit codes, byte aligned, so no padding symbols
    let mut image = RasterImage::new(8, 1).unwrap();
    for x in 0..8 {
        image.set(x, 0, Pixel::new(9, 9, 9)).unwrap();
    }
    let original = image.clone();

    let tree = image.compress().unwrap();
    assert_eq!(tree.leaf_count(), 1);
    image.decompress(&tree).unwrap();
    assert_eq!(image.pixel_bytes(), original.pixel_bytes());
}

/// Framed buffers decode to exactly the original bytes.
#[test]
fn test_framed_pixels_exact() {
    let image = gradient(21, 9);
    let (frame, tree) = compress_framed(image.pixel_bytes()).unwrap();
    let decoded = decompress_framed(&frame, &tree).unwrap();
    assert_eq!(decoded, image.pixel_bytes());
}

/// Hide an image, persist the result, and extract it again.
#[test]
fn test_steganography_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let cover = gradient(16, 16);
    let secret = gradient(32, 8);

    let stego_image = stego::hide(&cover, &secret).unwrap();
    let path = stego_image.save("cover_hidden_secret", dir.path()).unwrap();

    let loaded = RasterImage::load(&path).unwrap();
    let recovered = stego::extract(&loaded).unwrap();
    assert_eq!((recovered.width(), recovered.height()), (16, 16));

    // Secret was halved to 16x4; its top nibbles come back exactly
    let expected = secret.get(30, 6).unwrap();
    let got = recovered.get(15, 3).unwrap();
    assert_eq!(got.red, expected.red & 0xF0);
    assert_eq!(got.green, expected.green & 0xF0);
    assert_eq!(got.blue, expected.blue & 0xF0);

    // Cover keeps its high nibbles everywhere
    for (a, b) in stego_image.pixel_bytes().iter().zip(cover.pixel_bytes()) {
        assert_eq!(a & 0xF0, b & 0xF0);
    }
}

/// Loading garbage is a format error, not a panic.
#[test]
fn test_load_rejects_malformed_files() {
    let dir = tempfile::tempdir().unwrap();

    let short = dir.path().join("short.bmp");
    std::fs::write(&short, b"BM\x00\x00").unwrap();
    assert!(matches!(
        RasterImage::load(&short),
        Err(rastercodec_core::Error::Format(_))
    ));

    let bytes = gradient(5, 5).to_bytes();
    let truncated = dir.path().join("truncated.bmp");
    std::fs::write(&truncated, &bytes[..bytes.len() - 10]).unwrap();
    assert!(matches!(
        RasterImage::load(&truncated),
        Err(rastercodec_core::Error::Format(_))
    ));
}
