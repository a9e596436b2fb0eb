//! 24-bit bitmap images: load, save and pixel access.
//!
//! A [`RasterImage`] owns the header block and the pixel buffer exactly as
//! they appear on disk. Rows are stored bottom-to-top, each padded to a
//! 4-byte [`stride`], and every pixel occupies three bytes in blue, green,
//! red order. [`RasterImage::get`] and [`RasterImage::set`] translate between
//! that layout and top-down `(x, y)` coordinates with a red-green-blue
//! [`Pixel`].

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, FormatError, Result};
use crate::header::{stride, BitmapHeader, BYTES_PER_PIXEL, HEADER_LEN};
use crate::huffman::{self, HuffmanTree};

/// File extension used by [`RasterImage::save`].
pub const EXTENSION: &str = "bmp";

/// An RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Pixel {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Grey pixel at the integer mean of the three channels.
    pub fn grey_average(&self) -> Pixel {
        let grey = ((self.red as u16 + self.green as u16 + self.blue as u16) / 3) as u8;
        Pixel::new(grey, grey, grey)
    }
}

/// A bitmap held in memory as its header block and pixel buffer.
///
/// # Invariants
/// - `header_bytes.len() == header.data_offset` (at least 54)
/// - for images built by [`RasterImage::new`],
///   `header.file_size == header_bytes.len() + pixels.len()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    header: BitmapHeader,
    header_bytes: Vec<u8>,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Allocate a blank (all black) `width` x `height` image.
    ///
    /// # Errors
    /// `Error::InvalidArgument` unless both dimensions are positive and the
    /// file fits the 32-bit size field.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidArgument(format!(
                "width and height must be positive, got {width}x{height}"
            )));
        }

        let pixel_len = height as usize * stride(width);
        let block = BitmapHeader::synthesize(width, height, pixel_len)?;
        let header = BitmapHeader::parse(&block)?;
        let pixels = vec![0u8; pixel_len];

        Ok(Self {
            header,
            header_bytes: block.to_vec(),
            pixels,
        })
    }

    /// Parse an image from the bytes of a container file.
    ///
    /// The pixel buffer is the `file_size - data_offset` bytes starting at
    /// the data offset. Any bytes between the 54-byte header and the data
    /// offset stay with the header so [`RasterImage::to_bytes`] reproduces
    /// them. Bytes past the declared file size are ignored.
    ///
    /// # Errors
    /// Header errors from [`BitmapHeader::parse`], or
    /// `FormatError::Truncated` if the data is shorter than the header says.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = BitmapHeader::parse(bytes)?;

        let data_offset = header.data_offset as usize;
        let file_size = header.file_size as usize;
        if bytes.len() < file_size {
            return Err(FormatError::Truncated {
                required: file_size,
                actual: bytes.len(),
            }
            .into());
        }

        if data_offset > HEADER_LEN {
            debug!(
                "keeping {} bytes between header and pixel data",
                data_offset - HEADER_LEN
            );
        }

        Ok(Self {
            header,
            header_bytes: bytes[..data_offset].to_vec(),
            pixels: bytes[data_offset..file_size].to_vec(),
        })
    }

    /// Read and parse a container file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let image = Self::from_bytes(&bytes)?;
        debug!(
            "loaded {}: {}x{}, {} pixel bytes",
            path.display(),
            image.width(),
            image.height(),
            image.pixels.len()
        );
        Ok(image)
    }

    /// Header bytes followed by the pixel buffer, verbatim.
    pub fn to_bytes(&self) -> Vec<u8> {
        [self.header_bytes.as_slice(), self.pixels.as_slice()].concat()
    }

    /// Write the image to `directory/name.bmp`, creating the directory if
    /// needed. Returns the written path.
    pub fn save(&self, name: &str, directory: impl AsRef<Path>) -> Result<PathBuf> {
        let directory = directory.as_ref();
        fs::create_dir_all(directory)?;

        let path = directory.join(format!("{name}.{EXTENSION}"));
        fs::write(&path, self.to_bytes())?;
        debug!(
            "saved {} ({} bytes)",
            path.display(),
            self.header_bytes.len() + self.pixels.len()
        );
        Ok(path)
    }

    pub fn width(&self) -> i32 {
        self.header.width
    }

    pub fn height(&self) -> i32 {
        self.header.height
    }

    /// Bytes per pixel row including padding.
    pub fn stride(&self) -> usize {
        stride(self.header.width)
    }

    pub fn bits_per_pixel(&self) -> u16 {
        self.header.bits_per_pixel
    }

    /// Total file size recorded in the header.
    pub fn file_size(&self) -> u32 {
        self.header.file_size
    }

    /// Pixel data offset recorded in the header.
    pub fn data_offset(&self) -> u32 {
        self.header.data_offset
    }

    pub fn header(&self) -> &BitmapHeader {
        &self.header
    }

    pub fn header_bytes(&self) -> &[u8] {
        &self.header_bytes
    }

    pub fn pixel_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Byte offset of `(x, y)`; row 0 is the top row, stored last.
    fn offset(&self, x: i32, y: i32) -> Result<usize> {
        let out_of_bounds = || Error::PixelOutOfBounds {
            x,
            y,
            width: self.width(),
            height: self.height(),
        };

        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return Err(out_of_bounds());
        }

        let row = (self.height() - y - 1) as usize;
        let offset = x as usize * BYTES_PER_PIXEL + row * self.stride();
        // The buffer may be shorter than the grid, e.g. while compressed
        if offset + BYTES_PER_PIXEL > self.pixels.len() {
            return Err(out_of_bounds());
        }
        Ok(offset)
    }

    /// Read the pixel at `(x, y)`.
    ///
    /// # Errors
    /// `Error::PixelOutOfBounds` outside the image or its buffer.
    pub fn get(&self, x: i32, y: i32) -> Result<Pixel> {
        let at = self.offset(x, y)?;
        Ok(Pixel::new(self.pixels[at + 2], self.pixels[at + 1], self.pixels[at]))
    }

    /// Overwrite the pixel at `(x, y)`.
    ///
    /// # Errors
    /// `Error::PixelOutOfBounds` outside the image or its buffer.
    pub fn set(&mut self, x: i32, y: i32, pixel: Pixel) -> Result<()> {
        let at = self.offset(x, y)?;
        self.pixels[at] = pixel.blue;
        self.pixels[at + 1] = pixel.green;
        self.pixels[at + 2] = pixel.red;
        Ok(())
    }

    /// Copy into a freshly synthesized image, pixel by pixel.
    ///
    /// Unlike [`Clone`], the copy gets a canonical header: file size and
    /// data offset describe the new buffer, not whatever the source carried.
    pub fn copy(&self) -> Result<Self> {
        let mut copy = Self::new(self.width(), self.height())?;
        for x in 0..self.width() {
            for y in 0..self.height() {
                copy.set(x, y, self.get(x, y)?)?;
            }
        }
        Ok(copy)
    }

    /// Replace the pixel buffer with its entropy-coded form.
    ///
    /// The header is left untouched. The returned tree is required by
    /// [`RasterImage::decompress`].
    pub fn compress(&mut self) -> Result<HuffmanTree> {
        let (packed, tree) = huffman::compress(&self.pixels)?;
        debug!("compressed pixel buffer {} -> {} bytes", self.pixels.len(), packed.len());
        self.pixels = packed;
        Ok(tree)
    }

    /// Replace an entropy-coded buffer with its decoded bytes.
    ///
    /// Padding can decode to extra trailing bytes; they stay in the buffer
    /// and are ignored when the saved file is loaded again, since loading
    /// reads only as many bytes as the header declares.
    pub fn decompress(&mut self, tree: &HuffmanTree) -> Result<()> {
        let decoded = huffman::decompress(&self.pixels, tree)?;
        let declared = self.header.pixel_len();
        if decoded.len() != declared {
            debug!("decoded {} pixel bytes, header declares {}", decoded.len(), declared);
        }
        self.pixels = decoded;
        Ok(())
    }
}
