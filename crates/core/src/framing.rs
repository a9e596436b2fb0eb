//! Length- and checksum-framed entropy-coded payloads.
//!
//! The bare stream from [`huffman::compress`](crate::huffman::compress)
//! cannot tell real codes from padding, and a wrong tree decodes silently.
//! A frame records the original length and a CRC32 of the original bytes so
//! decoding can truncate the padding artifacts and detect a mismatched tree.
//! The tree itself is still not serialized: the caller keeps it.
//!
//! # Frame Format
//!
//! ```text
//! +------------------+
//! | Magic (4 bytes)  |  0x48 0x55 0x46 0x52 ("HUFR")
//! +------------------+
//! | raw_len (4)      |  u32 original uncompressed size
//! +------------------+
//! | payload_len (4)  |  u32 packed code bytes
//! +------------------+
//! | crc32 (4)        |  u32 checksum of the original bytes
//! +------------------+
//! | payload          |  Packed code bytes (payload_len bytes)
//! | (variable)       |
//! +------------------+
//! ```

use log::warn;

use crate::error::{Error, FramingError, HuffmanError, Result};
use crate::huffman::{self, HuffmanTree};

/// Magic number for frames: "HUFR"
const MAGIC: [u8; 4] = *b"HUFR";

/// Size of the frame header in bytes
const HEADER_SIZE: usize = 16;

/// A parsed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Original uncompressed data length
    pub raw_len: u32,

    /// CRC32 of the original data
    pub crc32: u32,

    /// Packed code bytes
    pub payload: Vec<u8>,
}

/// Length field value for `len`, which must fit in 32 bits.
fn length_field(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len)
        .map_err(|_| Error::InvalidArgument(format!("{what} of {len} bytes exceeds 4 GiB")))
}

/// Serialize a frame around an already compressed payload.
///
/// # Errors
/// `Error::InvalidArgument` if either length does not fit its 32-bit field.
pub fn serialize_frame(raw_data: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
    let raw_len = length_field(raw_data.len(), "raw data")?;
    let payload_len = length_field(payload.len(), "payload")?;
    let crc32 = crc32fast::hash(raw_data);

    let mut frame = Vec::with_capacity(HEADER_SIZE + payload.len());
    frame.extend_from_slice(&MAGIC);
    frame.extend_from_slice(&raw_len.to_le_bytes());
    frame.extend_from_slice(&payload_len.to_le_bytes());
    frame.extend_from_slice(&crc32.to_le_bytes());
    frame.extend_from_slice(payload);
    Ok(frame)
}

/// Parse a frame from bytes.
///
/// # Errors
/// - `FramingError::FrameTooShort` if the buffer cannot hold the header
/// - `FramingError::InvalidMagic` if the magic number doesn't match
/// - `FramingError::PayloadLengthMismatch` if the payload size disagrees
///   with the header
pub fn parse_frame(bytes: &[u8]) -> Result<Frame> {
    let header: &[u8; HEADER_SIZE] = bytes
        .get(..HEADER_SIZE)
        .and_then(|h| h.try_into().ok())
        .ok_or(FramingError::FrameTooShort {
            required: HEADER_SIZE,
            actual: bytes.len(),
        })?;

    let magic = [header[0], header[1], header[2], header[3]];
    if magic != MAGIC {
        return Err(FramingError::InvalidMagic {
            expected: MAGIC,
            actual: magic,
        }
        .into());
    }

    let field = |at: usize| {
        u32::from_le_bytes([header[at], header[at + 1], header[at + 2], header[at + 3]])
    };
    let raw_len = field(4);
    let payload_len = field(8) as usize;
    let crc32 = field(12);

    let payload = &bytes[HEADER_SIZE..];
    if payload.len() != payload_len {
        return Err(FramingError::PayloadLengthMismatch {
            expected: payload_len,
            actual: payload.len(),
        }
        .into());
    }

    Ok(Frame {
        raw_len,
        crc32,
        payload: payload.to_vec(),
    })
}

/// Compress `raw_data` and wrap the result in a frame.
pub fn compress_framed(raw_data: &[u8]) -> Result<(Vec<u8>, HuffmanTree)> {
    let (payload, tree) = huffman::compress(raw_data)?;
    Ok((serialize_frame(raw_data, &payload)?, tree))
}

/// Decode a frame produced by [`compress_framed`] with its tree.
///
/// # Errors
/// - Framing errors from [`parse_frame`]
/// - `HuffmanError::LengthMismatch` if fewer symbols decode than recorded
/// - `Error::Crc` if the decoded bytes do not match the stored checksum,
///   which is what a tree from a different buffer usually produces
pub fn decompress_framed(bytes: &[u8], tree: &HuffmanTree) -> Result<Vec<u8>> {
    let frame = parse_frame(bytes)?;
    let raw_len = frame.raw_len as usize;

    let mut decoded = huffman::decompress(&frame.payload, tree)?;
    if decoded.len() < raw_len {
        return Err(HuffmanError::LengthMismatch {
            expected: raw_len,
            actual: decoded.len(),
        }
        .into());
    }
    if decoded.len() > raw_len {
        warn!(
            "discarding {} symbols decoded from padding",
            decoded.len() - raw_len
        );
        decoded.truncate(raw_len);
    }

    let actual = crc32fast::hash(&decoded);
    if actual != frame.crc32 {
        return Err(Error::Crc {
            expected: frame.crc32,
            actual,
        });
    }

    Ok(decoded)
}
