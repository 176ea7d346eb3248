//! Fixed-capacity message framing for the sidpipe helper protocol.
//!
//! Every message is one contiguous buffer holding:
//! - A 4-byte little-endian message identifier
//! - A 4-byte little-endian content length
//! - Up to [`MAX_CONTENT_LENGTH`] bytes of content
//!
//! The buffer is allocated once and reused; building a message appends at the
//! content length, consuming one advances a separate read cursor.

pub mod error;
pub mod io;
pub mod message;

pub use error::{FrameError, Result};
pub use message::{Message, BUFFER_SIZE, HEADER_SIZE, MAX_CONTENT_LENGTH};
