use sidpipe_frame::FrameError;
use sidpipe_proto::{MessageId, ProtoError};

/// Errors that end the dispatch loop.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Reading the next request failed for a reason other than a clean close.
    #[error("receive failed: {0}")]
    Receive(#[source] FrameError),

    /// Writing a response failed.
    #[error("send failed: {0}")]
    Send(#[source] FrameError),

    /// The request identifier does not name a request kind.
    #[error("unknown request id {0}")]
    UnknownRequest(u32),

    /// A response could not be encoded into the response message.
    #[error("failed to encode {id}: {source}")]
    Encode {
        id: MessageId,
        #[source]
        source: ProtoError,
    },
}

/// Errors returned by [`Client`](crate::Client) calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Frame-level transfer error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Payload encoding/decoding error.
    #[error("protocol error: {0}")]
    Proto(#[from] ProtoError),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
