//! Initiator/responder RPC message codecs over varint framing.
//!
//! One codec works for every message schema: serialization is deferred
//! to a pluggable [`WireFormat`], and every message travels as a header
//! frame (method, sequence, optional error) followed by a body frame.
//! A zero-length body frame means "nothing to decode" and is how a
//! failed call ships its error in the header alone.
//!
//! The codecs are purely reactive: an external RPC engine drives them
//! call by call, owns sequence-number bookkeeping, and serializes
//! access if it issues concurrent calls over one connection.

pub mod error;
pub mod format;
pub mod header;
pub mod initiator;
mod io;
pub mod responder;

pub use error::{CodecError, Result};
pub use format::{JsonFormat, WireFormat};
pub use header::{Header, Request, Response};
pub use initiator::InitiatorCodec;
pub use responder::ResponderCodec;
