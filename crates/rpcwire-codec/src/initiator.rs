use std::io::{Read, Write};

use rpcwire_frame::{FrameConfig, FrameReader, FrameWriter};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{CodecError, Result};
use crate::format::{JsonFormat, WireFormat};
use crate::header::{Header, Request, Response};
use crate::io::{Conn, ReadPhase};

/// The originating side of one connection.
///
/// Mirror of [`crate::ResponderCodec`]: `write_request` →
/// `read_response_header` → `read_response_body` per call. Sequence
/// numbers are chosen by the engine driving this codec; responses are
/// matched to requests purely by the echoed sequence value. A remote
/// failure arrives as [`Response::error`] — data, not an `Err` — and
/// its body frame is still on the wire (zero-length) and must be
/// consumed like any other.
pub struct InitiatorCodec<R, W, F = JsonFormat> {
    conn: Option<Conn<R, W>>,
    format: F,
    phase: ReadPhase,
}

impl<R: Read, W: Write> InitiatorCodec<R, W> {
    /// Create an initiator codec with the JSON wire format.
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_format(reader, writer, JsonFormat)
    }
}

impl<R: Read, W: Write, F: WireFormat> InitiatorCodec<R, W, F> {
    /// Create an initiator codec with an explicit wire format.
    pub fn with_format(reader: R, writer: W, format: F) -> Self {
        Self::with_config(reader, writer, format, FrameConfig::default())
    }

    /// Create an initiator codec with explicit format and frame config.
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

    /// Write a request header and argument body back-to-back.
    pub fn write_request<T: Serialize>(&mut self, req: &Request, args: &T) -> Result<()> {
        if self.conn.is_none() {
            return Err(CodecError::Closed);
        }

        // Serialize both frames before writing anything, so a format
        // failure never leaves a header on the wire without its body.
        let header_bytes = self
            .format
            .to_bytes(&Header::for_request(req))
            .map_err(CodecError::format)?;
        let body_bytes = self.format.to_bytes(args).map_err(CodecError::format)?;

        let conn = self.conn()?;
        conn.writer.write_frame(&header_bytes)?;
        conn.writer.write_frame(&body_bytes)?;

        debug!(method = %req.method, sequence = req.sequence, "request written");
        Ok(())
    }

    /// Read and validate the next response header.
    ///
    /// A non-empty `error` field on the wire is surfaced as
    /// [`Response::error`]; the call failed remotely but the
    /// connection is fine. The response's body frame is pending either
    /// way and must be consumed before the next header.
    pub fn read_response_header(&mut self) -> Result<Response> {
        if self.phase != ReadPhase::Header {
            return Err(CodecError::OutOfTurn(
                "response body frame is still pending",
            ));
        }

        let payload = self.conn()?.reader.read_frame()?;
        let header: Header = self.format.from_bytes(&payload).map_err(CodecError::format)?;
        let (method, sequence, error) = header.into_parts()?;
        let error = error.filter(|e| !e.is_empty());

        self.phase = ReadPhase::Body;
        debug!(
            method = %method,
            sequence,
            failed = error.is_some(),
            "response header read"
        );
        Ok(Response {
            method,
            sequence,
            error,
        })
    }

    /// Decode the pending response body frame.
    ///
    /// Returns `None` for a zero-length body frame, which is how a
    /// failed call's response body arrives.
    pub fn read_response_body<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        let payload = self.consume_body_frame()?;
        if payload.is_empty() {
            return Ok(None);
        }
        let value = self.format.from_bytes(&payload).map_err(CodecError::format)?;
        Ok(Some(value))
    }

    /// Consume and drop the pending response body frame.
    pub fn discard_response_body(&mut self) -> Result<()> {
        let payload = self.consume_body_frame()?;
        debug!(len = payload.len(), "response body discarded");
        Ok(())
    }

    fn consume_body_frame(&mut self) -> Result<bytes::Bytes> {
        if self.phase != ReadPhase::Body {
            return Err(CodecError::OutOfTurn("no response header has been read"));
        }
        let payload = self.conn()?.reader.read_frame()?;
        self.phase = ReadPhase::Header;
        Ok(payload)
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

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::BytesMut;
    use rpcwire_frame::encode_frame;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Args {
        a: String,
        b: String,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Reply {
        c: String,
    }

    fn frames(payloads: &[&[u8]]) -> Cursor<Vec<u8>> {
        let mut wire = BytesMut::new();
        for payload in payloads {
            encode_frame(payload, &mut wire);
        }
        Cursor::new(wire.to_vec())
    }

    fn response_wire(header: &Header, body: &[u8]) -> Cursor<Vec<u8>> {
        let header_bytes = JsonFormat.to_bytes(header).unwrap();
        frames(&[&header_bytes, body])
    }

    #[test]
    fn write_request_emits_header_then_body() {
        let mut codec = InitiatorCodec::new(frames(&[]), Vec::new());
        let req = Request::new("Concat.Concat", 1);
        codec
            .write_request(
                &req,
                &Args {
                    a: "foo".to_string(),
                    b: "bar".to_string(),
                },
            )
            .unwrap();

        let wire = match codec.conn {
            Some(conn) => conn.writer.into_inner(),
            None => Vec::new(),
        };
        let mut reader = rpcwire_frame::FrameReader::new(Cursor::new(wire));

        let header: Header = JsonFormat
            .from_bytes(&reader.read_frame().unwrap())
            .unwrap();
        assert_eq!(header.method.as_deref(), Some("Concat.Concat"));
        assert_eq!(header.sequence, Some(1));
        assert_eq!(header.error, None);

        let args: Args = JsonFormat
            .from_bytes(&reader.read_frame().unwrap())
            .unwrap();
        assert_eq!(args.a, "foo");
        assert_eq!(args.b, "bar");
    }

    #[test]
    fn reads_successful_response() {
        let header = Header {
            method: Some("Concat.Concat".to_string()),
            sequence: Some(1),
            error: None,
        };
        let body = JsonFormat
            .to_bytes(&Reply {
                c: "foobar".to_string(),
            })
            .unwrap();
        let mut codec = InitiatorCodec::new(response_wire(&header, &body), Vec::new());

        let resp = codec.read_response_header().unwrap();
        assert_eq!(resp.sequence, 1);
        assert_eq!(resp.error, None);

        let reply: Option<Reply> = codec.read_response_body().unwrap();
        assert_eq!(reply.map(|r| r.c).as_deref(), Some("foobar"));
    }

    #[test]
    fn remote_error_is_data_not_failure() {
        let header = Header {
            method: Some("Unknown.Method".to_string()),
            sequence: Some(3),
            error: Some("unknown method: Unknown.Method".to_string()),
        };
        let mut codec = InitiatorCodec::new(response_wire(&header, b""), Vec::new());

        let resp = codec.read_response_header().unwrap();
        assert_eq!(
            resp.error.as_deref(),
            Some("unknown method: Unknown.Method")
        );

        // The zero-length body frame is still consumed.
        let reply: Option<Reply> = codec.read_response_body().unwrap();
        assert_eq!(reply, None);
    }

    #[test]
    fn empty_wire_error_reads_as_success() {
        let header = Header {
            method: Some("M.X".to_string()),
            sequence: Some(5),
            error: Some(String::new()),
        };
        let body = JsonFormat.to_bytes(&Reply { c: "ok".to_string() }).unwrap();
        let mut codec = InitiatorCodec::new(response_wire(&header, &body), Vec::new());

        let resp = codec.read_response_header().unwrap();
        assert_eq!(resp.error, None);
    }

    #[test]
    fn response_header_missing_fields_rejected() {
        let header = Header {
            method: None,
            sequence: None,
            error: None,
        };
        let mut codec = InitiatorCodec::new(response_wire(&header, b""), Vec::new());

        let err = codec.read_response_header().unwrap_err();
        assert!(matches!(err, CodecError::MissingMethod));
    }

    #[test]
    fn body_read_before_header_is_out_of_turn() {
        let mut codec = InitiatorCodec::new(frames(&[]), Vec::new());
        let err = codec.read_response_body::<Reply>().unwrap_err();
        assert!(matches!(err, CodecError::OutOfTurn(_)));
    }

    #[test]
    fn closed_codec_rejects_operations() {
        let mut codec = InitiatorCodec::new(frames(&[]), Vec::new());
        codec.close().unwrap();

        let req = Request::new("M.X", 1);
        assert!(matches!(
            codec.write_request(&req, &Args {
                a: String::new(),
                b: String::new(),
            }),
            Err(CodecError::Closed)
        ));
        assert!(matches!(
            codec.read_response_header(),
            Err(CodecError::Closed)
        ));
        assert!(matches!(codec.close(), Err(CodecError::Closed)));
    }
}
