use rpcwire_frame::{FrameReader, FrameWriter};

/// The exclusively-owned halves of one connection.
///
/// Wrapped in `Option` by the codecs so `close()` can drop the handles
/// exactly once; the `None` state is "closed".
pub(crate) struct Conn<R, W> {
    pub(crate) reader: FrameReader<R>,
    pub(crate) writer: FrameWriter<W>,
}

/// Header/body alternation state for the read side.
///
/// The body frame must be consumed after every successful header read
/// (even for calls the engine rejects) or the stream desynchronizes
/// for every subsequent call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadPhase {
    Header,
    Body,
}
