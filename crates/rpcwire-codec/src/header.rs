use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};

/// The fixed-schema record that precedes every message body.
///
/// All three fields are optional on the wire; presence of `method` and
/// `sequence` is a decode-time requirement, not a schema one, so a
/// violation surfaces as a named error instead of a zero default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Remote operation identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Correlation id chosen by the initiator and echoed verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
    /// Failure text for a failed remote call. Absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Header {
    /// Build the header for an outgoing request.
    pub fn for_request(req: &Request) -> Self {
        Self {
            method: Some(req.method.clone()),
            sequence: Some(req.sequence),
            error: None,
        }
    }

    /// Build the header for an outgoing response.
    ///
    /// An empty error string is treated as "no error" and never
    /// written as present.
    pub fn for_response(resp: &Response) -> Self {
        Self {
            method: Some(resp.method.clone()),
            sequence: Some(resp.sequence),
            error: resp.error.clone().filter(|e| !e.is_empty()),
        }
    }

    /// Validate required fields and split the header into parts.
    ///
    /// `method` is checked before `sequence`, so a header missing both
    /// deterministically fails with [`CodecError::MissingMethod`].
    pub fn into_parts(self) -> Result<(String, u64, Option<String>)> {
        let method = self.method.ok_or(CodecError::MissingMethod)?;
        let sequence = self.sequence.ok_or(CodecError::MissingSequence)?;
        Ok((method, sequence, self.error))
    }
}

/// Engine-facing record for one outgoing or incoming request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub sequence: u64,
}

impl Request {
    pub fn new(method: impl Into<String>, sequence: u64) -> Self {
        Self {
            method: method.into(),
            sequence,
        }
    }
}

/// Engine-facing record for one outgoing or incoming response.
///
/// `error` carries a remote call failure as data; the connection
/// remains usable after one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub method: String,
    pub sequence: u64,
    pub error: Option<String>,
}

impl Response {
    /// A successful response echoing the request's method and sequence.
    pub fn success(req: &Request) -> Self {
        Self {
            method: req.method.clone(),
            sequence: req.sequence,
            error: None,
        }
    }

    /// A failed response echoing the request's method and sequence.
    pub fn failure(req: &Request, error: impl Into<String>) -> Self {
        Self {
            method: req.method.clone(),
            sequence: req.sequence,
            error: Some(error.into()),
        }
    }
}
