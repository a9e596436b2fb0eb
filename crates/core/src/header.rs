//! The fixed 54-byte bitmap header.
//!
//! # Layout
//!
//! ```text
//! offset size field
//!      0    2 signature "BM"
//!      2    4 total file size
//!     10    4 pixel data offset
//!     14    4 info header size (40)
//!     18    4 width (signed)
//!     22    4 height (signed)
//!     26    2 color planes (1)
//!     28    2 bits per pixel (24)
//! ```
//!
//! All integers are little-endian. Bytes 6..10 are reserved and bytes 30..54
//! (compression, image size, resolution, palette counts) are left zero for
//! images created here.

use crate::endian::{
    read_i32_le, read_u16_le, read_u32_le, write_i32_le, write_u16_le, write_u32_le,
};
use crate::error::{Error, FormatError, Result};

/// Length of the fixed header block.
pub const HEADER_LEN: usize = 54;

/// Size of the info header that follows the 14-byte file header.
pub const INFO_HEADER_LEN: u32 = 40;

/// Container signature.
pub const SIGNATURE: [u8; 2] = *b"BM";

/// The only supported pixel depth.
pub const BITS_PER_PIXEL: u16 = 24;

/// Bytes per pixel at [`BITS_PER_PIXEL`].
pub const BYTES_PER_PIXEL: usize = 3;

pub const OFFSET_SIGNATURE: usize = 0;
pub const OFFSET_FILE_SIZE: usize = 2;
pub const OFFSET_DATA_OFFSET: usize = 10;
pub const OFFSET_INFO_SIZE: usize = 14;
pub const OFFSET_WIDTH: usize = 18;
pub const OFFSET_HEIGHT: usize = 22;
pub const OFFSET_PLANES: usize = 26;
pub const OFFSET_BITS_PER_PIXEL: usize = 28;

/// Bytes per pixel row, rounded up to a 4-byte boundary.
pub fn stride(width: i32) -> usize {
    (width.max(0) as usize * BYTES_PER_PIXEL).div_ceil(4) * 4
}

/// Parsed header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapHeader {
    pub file_size: u32,
    pub data_offset: u32,
    pub info_size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
}

impl BitmapHeader {
    /// Parse and validate the first 54 bytes of a container.
    ///
    /// # Errors
    /// - `FormatError::Truncated` if fewer than 54 bytes are given
    /// - `FormatError::InvalidSignature` unless the data starts with `BM`
    /// - `FormatError::NonPositiveDimensions` for zero or negative width/height
    /// - `FormatError::UnsupportedBitDepth` for anything but 24 bits per pixel
    /// - `FormatError::InvalidDataOffset` / `InvalidFileSize` for inconsistent sizes
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(FormatError::Truncated {
                required: HEADER_LEN,
                actual: bytes.len(),
            }
            .into());
        }

        let signature = [bytes[OFFSET_SIGNATURE], bytes[OFFSET_SIGNATURE + 1]];
        if signature != SIGNATURE {
            return Err(FormatError::InvalidSignature(signature).into());
        }

        let header = Self {
            file_size: read_u32_le(bytes, OFFSET_FILE_SIZE)?,
            data_offset: read_u32_le(bytes, OFFSET_DATA_OFFSET)?,
            info_size: read_u32_le(bytes, OFFSET_INFO_SIZE)?,
            width: read_i32_le(bytes, OFFSET_WIDTH)?,
            height: read_i32_le(bytes, OFFSET_HEIGHT)?,
            planes: read_u16_le(bytes, OFFSET_PLANES)?,
            bits_per_pixel: read_u16_le(bytes, OFFSET_BITS_PER_PIXEL)?,
        };

        if header.width <= 0 || header.height <= 0 {
            return Err(FormatError::NonPositiveDimensions {
                width: header.width,
                height: header.height,
            }
            .into());
        }
        if header.bits_per_pixel != BITS_PER_PIXEL {
            return Err(FormatError::UnsupportedBitDepth(header.bits_per_pixel).into());
        }
        if (header.data_offset as usize) < HEADER_LEN {
            return Err(FormatError::InvalidDataOffset(header.data_offset).into());
        }
        if header.file_size < header.data_offset {
            return Err(FormatError::InvalidFileSize {
                file_size: header.file_size,
                data_offset: header.data_offset,
            }
            .into());
        }

        Ok(header)
    }

    /// Number of pixel bytes the header declares (`file_size - data_offset`).
    pub fn pixel_len(&self) -> usize {
        (self.file_size - self.data_offset) as usize
    }

    /// Build the header block for a fresh `width` x `height` image.
    ///
    /// The total file size is back-patched last, once the pixel buffer
    /// length is known.
    ///
    /// # Errors
    /// `Error::InvalidArgument` if the file size does not fit the 32-bit
    /// field.
    pub fn synthesize(width: i32, height: i32, pixel_len: usize) -> Result<[u8; HEADER_LEN]> {
        let file_size = HEADER_LEN
            .checked_add(pixel_len)
            .and_then(|total| u32::try_from(total).ok())
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "{width}x{height} image: {pixel_len} pixel bytes exceed the 4 GiB limit"
                ))
            })?;

        let mut block = [0u8; HEADER_LEN];

        block[OFFSET_SIGNATURE..OFFSET_SIGNATURE + 2].copy_from_slice(&SIGNATURE);
        write_u32_le(&mut block, OFFSET_DATA_OFFSET, HEADER_LEN as u32)?;
        write_u32_le(&mut block, OFFSET_INFO_SIZE, INFO_HEADER_LEN)?;
        write_i32_le(&mut block, OFFSET_WIDTH, width)?;
        write_i32_le(&mut block, OFFSET_HEIGHT, height)?;
        write_u16_le(&mut block, OFFSET_PLANES, 1)?;
        write_u16_le(&mut block, OFFSET_BITS_PER_PIXEL, BITS_PER_PIXEL)?;

        write_u32_le(&mut block, OFFSET_FILE_SIZE, file_size)?;

        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_alignment() {
        assert_eq!(stride(1), 4);
        assert_eq!(stride(2), 8);
        assert_eq!(stride(3), 12);
        assert_eq!(stride(4), 12);
        assert_eq!(stride(5), 16);
        assert_eq!(stride(0), 0);
    }

    #[test]
    fn test_synthesize_layout() {
        let block = BitmapHeader::synthesize(3, 2, 24).unwrap();
        assert_eq!(&block[0..2], b"BM");
        assert_eq!(&block[2..6], &78u32.to_le_bytes());
        assert_eq!(&block[10..14], &54u32.to_le_bytes());
        assert_eq!(&block[14..18], &40u32.to_le_bytes());
        assert_eq!(&block[18..22], &3i32.to_le_bytes());
        assert_eq!(&block[22..26], &2i32.to_le_bytes());
        assert_eq!(&block[26..28], &1u16.to_le_bytes());
        assert_eq!(&block[28..30], &24u16.to_le_bytes());
        assert!(block[30..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_synthesize_rejects_oversized_file() {
        let limit = u32::MAX as usize - HEADER_LEN;
        assert!(BitmapHeader::synthesize(1, 1, limit).is_ok());
        assert!(matches!(
            BitmapHeader::synthesize(1, 1, limit + 1),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_synthesized() {
        let block = BitmapHeader::synthesize(7, 5, 5 * stride(7)).unwrap();
        let header = BitmapHeader::parse(&block).unwrap();
        assert_eq!(header.width, 7);
        assert_eq!(header.height, 5);
        assert_eq!(header.planes, 1);
        assert_eq!(header.info_size, 40);
        assert_eq!(header.data_offset, 54);
        assert_eq!(header.pixel_len(), 5 * 24);
    }

    #[test]
    fn test_parse_rejects_short_header() {
        let result = BitmapHeader::parse(&[b'B', b'M', 0, 0]);
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::Truncated { required: 54, actual: 4 }))
        ));
    }

    #[test]
    fn test_parse_rejects_bad_signature() {
        let mut block = BitmapHeader::synthesize(1, 1, 4).unwrap();
        block[0] = b'X';
        assert!(matches!(
            BitmapHeader::parse(&block),
            Err(Error::Format(FormatError::InvalidSignature(_)))
        ));
    }

    #[test]
    fn test_parse_rejects_non_positive_dimensions() {
        let mut block = BitmapHeader::synthesize(1, 1, 4).unwrap();
        write_i32_le(&mut block, OFFSET_HEIGHT, -1).unwrap();
        assert!(matches!(
            BitmapHeader::parse(&block),
            Err(Error::Format(FormatError::NonPositiveDimensions { width: 1, height: -1 }))
        ));
    }

    #[test]
    fn test_parse_rejects_other_bit_depths() {
        let mut block = BitmapHeader::synthesize(1, 1, 4).unwrap();
        write_u16_le(&mut block, OFFSET_BITS_PER_PIXEL, 32).unwrap();
        assert!(matches!(
            BitmapHeader::parse(&block),
            Err(Error::Format(FormatError::UnsupportedBitDepth(32)))
        ));
    }

    #[test]
    fn test_parse_rejects_inconsistent_sizes() {
        let mut block = BitmapHeader::synthesize(1, 1, 4).unwrap();
        write_u32_le(&mut block, OFFSET_DATA_OFFSET, 10).unwrap();
        assert!(matches!(
            BitmapHeader::parse(&block),
            Err(Error::Format(FormatError::InvalidDataOffset(10)))
        ));

        let mut block = BitmapHeader::synthesize(1, 1, 4).unwrap();
        write_u32_le(&mut block, OFFSET_FILE_SIZE, 20).unwrap();
        assert!(matches!(
            BitmapHeader::parse(&block),
            Err(Error::Format(FormatError::InvalidFileSize { .. }))
        ));
    }
}
