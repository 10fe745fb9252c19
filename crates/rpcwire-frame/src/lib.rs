//! Varint length-delimited message framing for byte-stream RPC.
//!
//! Every frame on the wire is:
//! - A base-128 varint payload length (7 payload bits per byte, high
//!   bit marks continuation, little-endian group order)
//! - Exactly that many payload bytes
//!
//! A zero-valued length prefix is a complete, legal frame with no
//! payload. No partial reads, no buffer management in user code.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_frame, decode_varint, encode_frame, encode_varint, FrameConfig, DEFAULT_MAX_PAYLOAD,
    MAX_VARINT_LEN,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
