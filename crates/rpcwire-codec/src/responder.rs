use std::io::{Read, Write};

use rpcwire_frame::{FrameConfig, FrameReader, FrameWriter};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{CodecError, Result};
use crate::format::{JsonFormat, WireFormat};
use crate::header::{Header, Request, Response};
use crate::io::{Conn, ReadPhase};

/// The answering side of one connection.
///
/// Driven call by call by an external RPC engine:
/// `read_request_header` → `read_request_body` (or
/// `discard_request_body`) → `write_response`, repeated until the peer
/// closes. The codec holds no per-call state beyond the connection and
/// the header/body read phase; correlating in-flight calls is the
/// engine's job. Callers issuing concurrent calls over one codec must
/// serialize access themselves so header and body frames are never
/// interleaved.
pub struct ResponderCodec<R, W, F = JsonFormat> {
    conn: Option<Conn<R, W>>,
    format: F,
    phase: ReadPhase,
}

impl<R: Read, W: Write> ResponderCodec<R, W> {
    /// Create a responder codec with the JSON wire format.
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_format(reader, writer, JsonFormat)
    }
}

impl<R: Read, W: Write, F: WireFormat> ResponderCodec<R, W, F> {
    /// Create a responder codec with an explicit wire format.
    pub fn with_format(reader: R, writer: W, format: F) -> Self {
        Self::with_config(reader, writer, format, FrameConfig::default())
    }

    /// Create a responder codec with explicit format and frame config.
    pub fn with_config(reader: R, writer: W, format: F, config: FrameConfig) -> Self {
        Self {
            conn: Some(Conn {
                reader: FrameReader::with_config(reader, config.clone()),
                writer: FrameWriter::with_config(writer, config),
            }),
            format,
            phase: ReadPhase::Header,
        }
    }

    fn conn(&mut self) -> Result<&mut Conn<R, W>> {
        self.conn.as_mut().ok_or(CodecError::Closed)
    }

    /// Read and validate the next request header.
    ///
    /// After a successful return the request's body frame is pending
    /// and must be consumed (read or discarded) before the next header.
    pub fn read_request_header(&mut self) -> Result<Request> {
        if self.phase != ReadPhase::Header {
            return Err(CodecError::OutOfTurn(
                "request body frame is still pending",
            ));
        }

        let payload = self.conn()?.reader.read_frame()?;
        let header: Header = self.format.from_bytes(&payload).map_err(CodecError::format)?;
        let (method, sequence, _error) = header.into_parts()?;

        self.phase = ReadPhase::Body;
        debug!(method = %method, sequence, "request header read");
        Ok(Request { method, sequence })
    }

    /// Decode the pending request body frame.
    ///
    /// Returns `None` for a zero-length body frame (nothing to decode).
    pub fn read_request_body<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        let payload = self.consume_body_frame()?;
        if payload.is_empty() {
            return Ok(None);
        }
        let value = self.format.from_bytes(&payload).map_err(CodecError::format)?;
        Ok(Some(value))
    }

    /// Consume and drop the pending request body frame.
    ///
    /// Used when the method is unrecognized: the body must still leave
    /// the stream to keep subsequent calls aligned.
    pub fn discard_request_body(&mut self) -> Result<()> {
        let payload = self.consume_body_frame()?;
        debug!(len = payload.len(), "request body discarded");
        Ok(())
    }

    fn consume_body_frame(&mut self) -> Result<bytes::Bytes> {
        if self.phase != ReadPhase::Body {
            return Err(CodecError::OutOfTurn("no request header has been read"));
        }
        let payload = self.conn()?.reader.read_frame()?;
        self.phase = ReadPhase::Header;
        Ok(payload)
    }

    /// Write a response header and body back-to-back.
    ///
    /// A failed call carries its error text in the header and `None`
    /// for the body, which goes out as a zero-length frame.
    pub fn write_response<T: Serialize>(&mut self, resp: &Response, body: Option<&T>) -> Result<()> {
        if self.conn.is_none() {
            return Err(CodecError::Closed);
        }

        // Serialize both frames before writing anything, so a format
        // failure never leaves a header on the wire without its body.
        let header_bytes = self
            .format
            .to_bytes(&Header::for_response(resp))
            .map_err(CodecError::format)?;
        let body_bytes = match body {
            Some(value) => Some(self.format.to_bytes(value).map_err(CodecError::format)?),
            None => None,
        };

        let conn = self.conn()?;
        conn.writer.write_frame(&header_bytes)?;
        match &body_bytes {
            Some(bytes) => conn.writer.write_frame(bytes)?,
            None => conn.writer.write_frame(&[])?,
        }

        debug!(
            method = %resp.method,
            sequence = resp.sequence,
            failed = resp.error.is_some(),
            "response written"
        );
        Ok(())
    }

    /// Flush and close the connection.
    ///
    /// The handles are released exactly once; every operation after
    /// this (including a second `close`) fails with
    /// [`CodecError::Closed`].
    pub fn close(&mut self) -> Result<()> {
        let mut conn = self.conn.take().ok_or(CodecError::Closed)?;
        conn.writer.flush()?;
        Ok(())
    }
}
