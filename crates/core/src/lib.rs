//! rastercodec-core: 24-bit bitmap container, Huffman pixel coding and
//! nibble steganography
//!
//! This library provides the binary codec layer of a small image editor:
//! - Loads and saves uncompressed 24-bit bitmaps with bit-exact headers
//! - Addresses pixels in bottom-up, 4-byte-aligned rows
//! - Entropy-codes a pixel buffer with a frequency-built Huffman tree
//! - Hides one image in the low nibbles of another
//!
//! # Architecture
//!
//! - `endian`: Little-endian header field codecs
//! - `header`: The fixed 54-byte header layout
//! - `raster`: Images, pixels, load/save
//! - `bitio`: MSB-first bit packing and nibble helpers
//! - `huffman`: Tree construction, code tables, compress/decompress
//! - `framing`: Optional length + CRC wrapper for compressed buffers
//! - `resample`: Nearest-neighbour rescaling
//! - `stego`: Hide/extract
//! - `metrics`: Observable compression statistics
//!
//! # Example
//!
//! ```
//! use rastercodec_core::{Pixel, RasterImage};
//!
//! let mut image = RasterImage::new(4, 4).unwrap();
//! image.set(0, 0, Pixel::new(10, 20, 30)).unwrap();
//!
//! let tree = image.compress().unwrap();
//! image.decompress(&tree).unwrap();
//! assert_eq!(image.get(0, 0).unwrap(), Pixel::new(10, 20, 30));
//! ```

pub mod bitio;
pub mod endian;
pub mod error;
pub mod framing;
pub mod header;
pub mod huffman;
pub mod metrics;
pub mod raster;
pub mod resample;
pub mod stego;

// Re-export commonly used types
pub use error::{Error, Result};
pub use huffman::{compress, decompress, CodeTable, HuffmanNode, HuffmanTree};
pub use metrics::CodecMetrics;
pub use raster::{Pixel, RasterImage};
pub use stego::{extract, hide};
