//! Error types for the raster codec.
//!
//! All operations return structured errors rather than panicking, including
//! pixel access outside the image, which is checked instead of silently
//! touching neighbouring bytes.

use thiserror::Error;

/// Top-level error type for all operations in the crate.
///
/// Each variant corresponds to a specific failure domain:
/// - Format: the container bytes are malformed or truncated
/// - Invalid argument: a constructor was given unusable dimensions
/// - Pixel access: coordinates outside the image or its buffer
/// - Bit I/O: reading bits past the end of a packed buffer
/// - Huffman: tree construction or decode failures
/// - Framing: the optional length/CRC container is malformed
/// - CRC: decoded data does not match the stored checksum
/// - I/O: file system operations
#[derive(Debug, Error)]
pub enum Error {
    /// Container header or pixel data is malformed
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Constructor argument out of range (e.g. non-positive width)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Pixel coordinate outside the image, or outside the pixel buffer
    #[error("pixel ({x}, {y}) out of bounds for {width}x{height} image")]
    PixelOutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Huffman codec error
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Framed container error
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    /// CRC validation failed, usually a tree that does not match the payload
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Container format errors raised while parsing a bitmap.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// Fewer bytes than the header or the declared pixel data requires
    #[error("truncated data: need {required} bytes, got {actual}")]
    Truncated { required: usize, actual: usize },

    /// First two bytes are not `BM`
    #[error("invalid signature: expected \"BM\", got {0:?}")]
    InvalidSignature([u8; 2]),

    /// Width or height is zero or negative
    #[error("non-positive dimensions: {width}x{height}")]
    NonPositiveDimensions { width: i32, height: i32 },

    /// Only 24 bits per pixel is addressable
    #[error("unsupported bit depth: {0} bits per pixel")]
    UnsupportedBitDepth(u16),

    /// Pixel data offset points inside the fixed header
    #[error("pixel data offset {0} lies inside the 54-byte header")]
    InvalidDataOffset(u32),

    /// Declared file size is smaller than the pixel data offset
    #[error("file size {file_size} smaller than data offset {data_offset}")]
    InvalidFileSize { file_size: u32, data_offset: u32 },
}

/// Bit-level I/O errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,
}

/// Huffman codec errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HuffmanError {
    /// Compressed bits were supplied but the tree has no root
    #[error("cannot decode {bits} bits with an empty tree")]
    EmptyTree { bits: usize },

    /// Symbol has no code in the table built for this tree
    #[error("symbol {0} has no code in the table")]
    MissingSymbol(u8),

    /// Decoded length doesn't match expected length
    #[error("decoded length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Framed container errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FramingError {
    /// Invalid magic number in header
    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Frame is too short to contain a valid header
    #[error("frame too short: need at least {required} bytes, got {actual}")]
    FrameTooShort { required: usize, actual: usize },

    /// Payload length doesn't match header specification
    #[error("payload length mismatch: header says {expected}, got {actual}")]
    PayloadLengthMismatch { expected: usize, actual: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
