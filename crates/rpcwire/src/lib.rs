//! Varint-framed RPC message codec.
//!
//! rpcwire lets a generic RPC engine exchange arbitrary serializable
//! messages over one byte stream: every message is a varint
//! length-delimited header frame (method, sequence, optional error)
//! followed by a body frame.
//!
//! # Crate Structure
//!
//! - [`frame`] — Varint length-delimited framing
//! - [`codec`] — Header schema plus the initiator/responder codecs

/// Re-export frame types.
pub mod frame {
    pub use rpcwire_frame::*;
}

/// Re-export codec types.
pub mod codec {
    pub use rpcwire_codec::*;
}
