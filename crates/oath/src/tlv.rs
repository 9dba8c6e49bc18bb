//! One-byte tag, one-byte length TLV blocks
//!
//! The OATH applet only uses short blocks: a single tag byte, a single length
//! byte (0-255) and the value. Multi-byte tags and extended lengths never occur.

use bytes::{BufMut, BytesMut};

use crate::{Error, Result};

/// Append a `tag | len | value` block to `buf`
///
/// # Errors
/// Returns [`Error::ValueTooLong`] if the value does not fit a one byte length.
pub fn encode_block(buf: &mut BytesMut, tag: u8, value: &[u8]) -> Result<()> {
    let len = u8::try_from(value.len()).map_err(|_| Error::ValueTooLong(value.len()))?;
    buf.reserve(2 + value.len());
    buf.put_u8(tag);
    buf.put_u8(len);
    buf.put_slice(value);
    Ok(())
}

/// Read the block starting at `offset` and return its value
///
/// The tag must equal `expected_tag`. Bytes following the block are ignored.
///
/// # Errors
/// - [`Error::UnexpectedTag`] if the block carries another tag
/// - [`Error::BufferUnderflow`] if the buffer ends before the declared value does
pub fn parse_block(buffer: &[u8], offset: usize, expected_tag: u8) -> Result<&[u8]> {
    let rest = buffer.get(offset..).unwrap_or_default();
    match rest {
        [] => Err(Error::BufferUnderflow {
            needed: 2,
            available: 0,
        }),
        [tag, ..] if *tag != expected_tag => Err(Error::UnexpectedTag {
            expected: expected_tag,
            actual: *tag,
        }),
        [_] => Err(Error::BufferUnderflow {
            needed: 2,
            available: 1,
        }),
        [_, len, value @ ..] => {
            let len = *len as usize;
            value.get(..len).ok_or(Error::BufferUnderflow {
                needed: 2 + len,
                available: rest.len(),
            })
        }
    }
}
