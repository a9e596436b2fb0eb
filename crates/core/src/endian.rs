//! Little-endian field codecs for the container header.
//!
//! Every multi-byte header field is stored least significant byte first.
//! These helpers decode and encode 16/32-bit fields at a byte offset and
//! report a [`FormatError::Truncated`] instead of indexing past the slice.

use crate::error::{FormatError, Result};

fn span<const N: usize>(bytes: &[u8], offset: usize) -> Result<[u8; N]> {
    let end = offset + N;
    bytes
        .get(offset..end)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| {
            FormatError::Truncated {
                required: end,
                actual: bytes.len(),
            }
            .into()
        })
}

fn span_mut<const N: usize>(bytes: &mut [u8], offset: usize) -> Result<&mut [u8]> {
    let len = bytes.len();
    let end = offset + N;
    bytes.get_mut(offset..end).ok_or_else(|| {
        FormatError::Truncated {
            required: end,
            actual: len,
        }
        .into()
    })
}

/// Decode an unsigned 16-bit field.
pub fn read_u16_le(bytes: &[u8], offset: usize) -> Result<u16> {
    Ok(u16::from_le_bytes(span::<2>(bytes, offset)?))
}

/// Decode an unsigned 32-bit field.
pub fn read_u32_le(bytes: &[u8], offset: usize) -> Result<u32> {
    Ok(u32::from_le_bytes(span::<4>(bytes, offset)?))
}

/// Decode a signed 32-bit field (width and height are signed on disk).
pub fn read_i32_le(bytes: &[u8], offset: usize) -> Result<i32> {
    Ok(i32::from_le_bytes(span::<4>(bytes, offset)?))
}

/// Encode an unsigned 16-bit field.
pub fn write_u16_le(bytes: &mut [u8], offset: usize, value: u16) -> Result<()> {
    span_mut::<2>(bytes, offset)?.copy_from_slice(&value.to_le_bytes());
    Ok(())
}

/// Encode an unsigned 32-bit field.
pub fn write_u32_le(bytes: &mut [u8], offset: usize, value: u32) -> Result<()> {
    span_mut::<4>(bytes, offset)?.copy_from_slice(&value.to_le_bytes());
    Ok(())
}

/// Encode a signed 32-bit field.
pub fn write_i32_le(bytes: &mut [u8], offset: usize, value: i32) -> Result<()> {
    span_mut::<4>(bytes, offset)?.copy_from_slice(&value.to_le_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_read_fields_at_offset() {
        let bytes = [0xAA, 0x36, 0x00, 0x00, 0x00, 0x18, 0x00];
        assert_eq!(read_u32_le(&bytes, 1).unwrap(), 54);
        assert_eq!(read_u16_le(&bytes, 5).unwrap(), 24);
    }

    #[test]
    fn test_signed_field() {
        let mut bytes = [0u8; 4];
        write_i32_le(&mut bytes, 0, -2).unwrap();
        assert_eq!(bytes, [0xFE, 0xFF, 0xFF, 0xFF]);
        assert_eq!(read_i32_le(&bytes, 0).unwrap(), -2);
        assert_eq!(read_u32_le(&bytes, 0).unwrap(), u32::MAX - 1);
    }

    #[test]
    fn test_write_little_endian_order() {
        let mut bytes = [0u8; 6];
        write_u32_le(&mut bytes, 2, 0x0102_0304).unwrap();
        assert_eq!(bytes, [0, 0, 0x04, 0x03, 0x02, 0x01]);
        write_u16_le(&mut bytes, 0, 0x4D42).unwrap();
        assert_eq!(&bytes[..2], b"BM");
    }

    #[test]
    fn test_out_of_range() {
        let bytes = [0u8; 3];
        assert!(matches!(
            read_u32_le(&bytes, 0),
            Err(Error::Format(FormatError::Truncated { required: 4, actual: 3 }))
        ));

        let mut bytes = [0u8; 4];
        assert!(write_u16_le(&mut bytes, 3, 1).is_err());
        assert_eq!(bytes, [0; 4]);
    }
}
