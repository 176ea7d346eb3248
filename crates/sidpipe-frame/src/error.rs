/// Errors that can occur while building, consuming or transferring messages.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A write or a declared length would exceed the fixed content capacity.
    #[error("content too large ({size} bytes, max {max})")]
    ContentTooLarge { size: usize, max: usize },

    /// A read asked for more bytes than remain before the content length.
    #[error("read past end of content ({requested} bytes at offset {offset}, length {length})")]
    ReadPastEnd {
        offset: usize,
        requested: usize,
        length: usize,
    },

    /// No zero terminator between the read cursor and the content length.
    #[error("unterminated string at offset {offset}")]
    UnterminatedString { offset: usize },

    /// A string to be written contains a zero byte.
    #[error("string contains a zero byte at offset {offset}")]
    InteriorNul { offset: usize },

    /// An I/O error occurred while reading or writing a frame.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended cleanly before the first byte of a frame.
    #[error("connection closed")]
    ConnectionClosed,

    /// The stream ended in the middle of a frame.
    #[error("connection closed mid-frame ({received} of {expected} bytes)")]
    Truncated { received: usize, expected: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
