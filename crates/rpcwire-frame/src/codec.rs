use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Maximum encoded width of a u64 varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Default maximum payload size: 16 MiB.
///
/// The length prefix is peer-controlled, so decoding always enforces a
/// cap before allocating. Raise it via [`FrameConfig`] if a deployment
/// genuinely needs larger messages.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Encode `value` as a base-128 varint, appending to `dst`.
pub fn encode_varint(mut value: u64, dst: &mut BytesMut) {
    dst.reserve(MAX_VARINT_LEN);
    while value >= 0x80 {
        dst.put_u8((value as u8) | 0x80);
        value >>= 7;
    }
    dst.put_u8(value as u8);
}

/// Decode a base-128 varint from the front of `src` without consuming.
///
/// Returns `Ok(None)` if `src` ends mid-varint, otherwise the decoded
/// value and the number of prefix bytes it occupied.
pub fn decode_varint(src: &[u8]) -> Result<Option<(u64, usize)>> {
    let mut value = 0u64;
    let mut shift = 0u32;
    for (i, &byte) in src.iter().enumerate() {
        if byte & 0x80 == 0 {
            // Tenth byte may only contribute a single bit.
            if i + 1 == MAX_VARINT_LEN && byte > 1 {
                return Err(FrameError::MalformedVarint);
            }
            value |= u64::from(byte) << shift;
            return Ok(Some((value, i + 1)));
        }
        if i + 1 == MAX_VARINT_LEN {
            return Err(FrameError::MalformedVarint);
        }
        value |= u64::from(byte & 0x7F) << shift;
        shift += 7;
    }
    Ok(None)
}

/// Encode a frame (varint length prefix + payload) into `dst`.
///
/// Wire format:
/// ```text
/// ┌────────────────────┬──────────────────┐
/// │ Length (varint)    │ Payload           │
/// │ 1-10 bytes         │ (Length bytes)    │
/// └────────────────────┴──────────────────┘
/// ```
/// An empty payload encodes as a single `0x00` byte.
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) {
    dst.reserve(MAX_VARINT_LEN + payload.len());
    encode_varint(payload.len() as u64, dst);
    dst.put_slice(payload);
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame
/// yet. On success, consumes the frame bytes from the buffer. The size
/// cap is enforced as soon as the length prefix decodes, before any
/// payload is buffered or allocated.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Bytes>> {
    let Some((declared, prefix_len)) = decode_varint(&src[..])? else {
        return Ok(None); // Need more data
    };

    if declared > max_payload as u64 {
        return Err(FrameError::FrameTooLarge {
            size: declared,
            max: max_payload,
        });
    }
    let payload_len = declared as usize;

    if src.len() < prefix_len + payload_len {
        return Ok(None); // Need more data
    }

    src.advance(prefix_len);
    Ok(Some(src.split_to(payload_len).freeze()))
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}
