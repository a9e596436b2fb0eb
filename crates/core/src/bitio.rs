//! Bit-level packing shared by the entropy coder and steganography.
//!
//! [`BitWriter`] and [`BitReader`] move bits MSB-first (most significant bit
//! first) between a bit stream and packed bytes. The entropy coder streams
//! its codes through them one bit at a time. The free functions do the same
//! packing on explicit `bool` sequences.
//!
//! # Padding Rules
//! - Packing pads the final partial byte with trailing zeros
//! - Unpacking always yields a multiple of 8 bits; the caller must know how
//!   many of them are meaningful
//!
//! # Example
//! ```
//! use rastercodec_core::bitio::{pack_msb_first, pad_to_byte_multiple, unpack_msb_first};
//!
//! let mut bits = vec![true, false, true, true, true];
//! pad_to_byte_multiple(&mut bits);
//! assert_eq!(bits.len(), 8);
//!
//! let bytes = pack_msb_first(&bits);
//! assert_eq!(bytes, vec![0b10111000]);
//! assert_eq!(unpack_msb_first(&bytes), bits);
//! ```

use crate::error::{BitIoError, Result};

/// Writes bits MSB-first into a byte buffer.
///
/// # Invariants
/// - `bit_count` is always < 8
#[derive(Debug, Clone)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    /// Create a new BitWriter with empty output.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a BitWriter expecting roughly `bytes` bytes of output.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Append a single bit.
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.bit_buffer |= 0x80 >> self.bit_count;
        }
        self.bit_count += 1;

        if self.bit_count == 8 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
    }

    /// Finish writing and return the output bytes.
    ///
    /// A partial final byte is padded with trailing zeros. This consumes the
    /// writer.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        self.bytes
    }

    /// Return the total number of bits written (including partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads bits MSB-first from a byte buffer.
///
/// Padding bits at the end of the buffer are not distinguishable from data.
///
/// # Invariants
/// - `bit_position` never exceeds `data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Current bit position (0 = MSB of first byte)
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            bit_position: 0,
        }
    }

    /// Read a single bit.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` once every bit has been consumed.
    pub fn read_bit(&mut self) -> Result<bool> {
        let byte = self
            .data
            .get(self.bit_position / 8)
            .ok_or(BitIoError::UnexpectedEof)?;
        let bit = (byte >> (7 - self.bit_position % 8)) & 1 == 1;
        self.bit_position += 1;
        Ok(bit)
    }

    /// Check if we're at the end of the buffer.
    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.data.len() * 8
    }
}

/// Append `false` bits until the length is a multiple of 8.
///
/// A sequence already on a byte boundary is left unchanged.
pub fn pad_to_byte_multiple(bits: &mut Vec<bool>) {
    let rem = bits.len() % 8;
    if rem != 0 {
        bits.resize(bits.len() + 8 - rem, false);
    }
}

/// Pack bits into bytes: bit `i` lands in bit `7 - i % 8` of byte `i / 8`.
pub fn pack_msb_first(bits: &[bool]) -> Vec<u8> {
    let mut writer = BitWriter::with_capacity(bits.len().div_ceil(8));
    for &bit in bits {
        writer.write_bit(bit);
    }
    writer.finish()
}

/// Expand every byte into its 8 bits, most significant first.
pub fn unpack_msb_first(bytes: &[u8]) -> Vec<bool> {
    let mut reader = BitReader::new(bytes);
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    while let Ok(bit) = reader.read_bit() {
        bits.push(bit);
    }
    bits
}

/// Keep the high nibble of `cover` and store the high nibble of `hidden`
/// in its low nibble.
pub fn fuse_high_nibbles(cover: u8, hidden: u8) -> u8 {
    (cover & 0xF0) | ((hidden >> 4) & 0x0F)
}

/// Move the low nibble into the high nibble, zero-filling the low one.
pub fn promote_low_nibble(byte: u8) -> u8 {
    (byte << 4) & 0xF0
}
