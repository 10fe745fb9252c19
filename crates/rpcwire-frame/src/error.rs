/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The varint length prefix cannot be decoded.
    #[error("malformed varint length prefix")]
    MalformedVarint,

    /// The stream ended before the declared frame length was satisfied.
    #[error("short read: stream ended mid-frame ({buffered} bytes buffered)")]
    ShortRead { buffered: usize },

    /// The declared payload length exceeds the configured maximum.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: u64, max: usize },

    /// The length prefix or payload could not be fully written.
    #[error("frame write failed: {0}")]
    WriteFailed(#[source] std::io::Error),

    /// An I/O error occurred while reading frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed cleanly at a frame boundary.
    #[error("connection closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
