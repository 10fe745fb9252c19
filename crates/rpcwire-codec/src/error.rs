/// Errors that can occur in codec operations.
///
/// A remote call failure is not represented here: it arrives as data in
/// [`crate::Response::error`] and the connection stays usable.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Framing-level error. Connection-fatal.
    #[error("frame error: {0}")]
    Frame(#[from] rpcwire_frame::FrameError),

    /// A decoded header has no method name.
    #[error("header missing method")]
    MissingMethod,

    /// A decoded header has no sequence number.
    #[error("header missing sequence")]
    MissingSequence,

    /// The wire format failed to serialize or deserialize a value.
    #[error("wire format error: {0}")]
    Format(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A read was issued out of header/body order.
    #[error("protocol sequencing violation: {0}")]
    OutOfTurn(&'static str),

    /// The codec has been closed.
    #[error("codec is closed")]
    Closed,
}

impl CodecError {
    pub(crate) fn format<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Format(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
