use sidpipe_frame::FrameError;

use crate::id::MessageId;

/// Errors that can occur while encoding or decoding payloads.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    /// The underlying message buffer rejected a read or write.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The identifier does not name a known message kind.
    #[error("unknown message id {0}")]
    UnknownMessage(u32),

    /// A different message kind arrived than the one expected.
    #[error("expected {expected} message, got id {actual}")]
    UnexpectedMessage { expected: MessageId, actual: u32 },

    /// An enumerated field holds a value outside its range.
    #[error("invalid {field} value {value}")]
    InvalidValue { field: &'static str, value: u32 },

    /// A path does not fit the fixed-size path field.
    #[error("path too long ({len} bytes, max {max})")]
    PathTooLong { len: usize, max: usize },

    /// A fixed-size path field holds no terminator.
    #[error("path field is not zero-terminated")]
    UnterminatedPath,

    /// More samples than fit into one response.
    #[error("too many samples ({count}, max {max})")]
    TooManySamples { count: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, ProtoError>;
