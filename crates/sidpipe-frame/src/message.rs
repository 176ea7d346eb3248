use std::fmt;
use std::io::{Read, Write};

use tracing::trace;

use crate::error::{FrameError, Result};
use crate::io::{read_full, write_full};

/// Total buffer size of one message: header plus content.
pub const BUFFER_SIZE: usize = 8129;

/// Header: identifier (4) + content length (4) = 8 bytes.
pub const HEADER_SIZE: usize = 8;

/// Maximum number of content bytes a message can carry.
pub const MAX_CONTENT_LENGTH: usize = BUFFER_SIZE - HEADER_SIZE;

const ID_OFFSET: usize = 0;
const LENGTH_OFFSET: usize = 4;

/// One framed message backed by a fixed, reusable buffer.
///
/// Wire format:
/// ```text
/// ┌──────────────┬────────────────┬──────────────────────┐
/// │ Identifier   │ Content length │ Content              │
/// │ (4B LE)      │ (4B LE)        │ (length bytes)       │
/// └──────────────┴────────────────┴──────────────────────┘
/// ```
///
/// The content length doubles as the append position while a message is
/// being built. A separate read cursor tracks sequential decoding of a
/// received message. Neither can move past the content capacity, and the
/// read cursor never moves past the content length.
pub struct Message {
    buf: Box<[u8; BUFFER_SIZE]>,
    read_cursor: usize,
}

impl Message {
    /// Allocate an empty message (identifier 0, no content).
    pub fn new() -> Self {
        Self {
            buf: Box::new([0u8; BUFFER_SIZE]),
            read_cursor: 0,
        }
    }

    /// Reset identifier, content length and read cursor to 0.
    ///
    /// Content bytes are left in place; nothing past the content length is
    /// ever handed out.
    pub fn clear(&mut self) {
        self.put_header_field(ID_OFFSET, 0);
        self.put_header_field(LENGTH_OFFSET, 0);
        self.read_cursor = 0;
    }

    /// The message identifier.
    pub fn id(&self) -> u32 {
        self.header_field(ID_OFFSET)
    }

    /// Set the message identifier.
    pub fn set_id(&mut self, id: u32) {
        self.put_header_field(ID_OFFSET, id);
    }

    /// Number of valid content bytes.
    pub fn content_length(&self) -> usize {
        self.header_field(LENGTH_OFFSET) as usize
    }

    /// Declare how many content bytes are valid.
    ///
    /// The caller is responsible for having populated them, typically through
    /// [`Message::content_mut`]. Lengths above [`MAX_CONTENT_LENGTH`] are
    /// rejected. The read cursor is pulled back if it would end up past the
    /// new length.
    pub fn set_content_length(&mut self, length: usize) -> Result<()> {
        if length > MAX_CONTENT_LENGTH {
            return Err(FrameError::ContentTooLarge {
                size: length,
                max: MAX_CONTENT_LENGTH,
            });
        }
        self.put_header_field(LENGTH_OFFSET, length as u32);
        self.read_cursor = self.read_cursor.min(length);
        Ok(())
    }

    /// The fixed content capacity shared by every message.
    pub const fn max_content_length() -> usize {
        MAX_CONTENT_LENGTH
    }

    /// Bytes that can still be appended.
    pub fn remaining(&self) -> usize {
        MAX_CONTENT_LENGTH - self.content_length()
    }

    /// The valid content bytes.
    pub fn content(&self) -> &[u8] {
        &self.buf[HEADER_SIZE..HEADER_SIZE + self.content_length()]
    }

    /// The whole content region, regardless of the content length.
    pub fn content_mut(&mut self) -> &mut [u8] {
        &mut self.buf[HEADER_SIZE..]
    }

    /// Offset of the next unread content byte.
    pub fn read_cursor(&self) -> usize {
        self.read_cursor
    }

    /// Move the read cursor back to the start of the content.
    pub fn rewind(&mut self) {
        self.read_cursor = 0;
    }

    /// The bytes this message occupies on the wire.
    pub fn as_frame(&self) -> &[u8] {
        &self.buf[..HEADER_SIZE + self.content_length()]
    }

    /// Write header and content to `stream` in one piece, then flush.
    pub fn send<W: Write + ?Sized>(&self, stream: &mut W) -> Result<()> {
        trace!(
            id = self.id(),
            length = self.content_length(),
            "sending message"
        );
        write_full(stream, self.as_frame())
    }

    /// Read one complete frame from `stream` into this message.
    ///
    /// The header is read first. A declared content length above
    /// [`MAX_CONTENT_LENGTH`] is rejected before any content is read and the
    /// previous header is kept. On success the read cursor is reset to 0.
    ///
    /// If the stream ends inside the content, the new header has already
    /// replaced the old one and the content region holds a mix of old and new
    /// bytes. Such a message must be cleared before it is used again.
    pub fn receive<R: Read + ?Sized>(&mut self, stream: &mut R) -> Result<()> {
        let mut header = [0u8; HEADER_SIZE];
        read_full(stream, &mut header)?;

        let declared = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
        if declared > MAX_CONTENT_LENGTH {
            return Err(FrameError::ContentTooLarge {
                size: declared,
                max: MAX_CONTENT_LENGTH,
            });
        }

        self.buf[..HEADER_SIZE].copy_from_slice(&header);
        self.read_cursor = self.read_cursor.min(declared);

        read_full(stream, &mut self.buf[HEADER_SIZE..HEADER_SIZE + declared]).map_err(
            |err| match err {
                FrameError::ConnectionClosed => FrameError::Truncated {
                    received: 0,
                    expected: declared,
                },
                other => other,
            },
        )?;

        self.read_cursor = 0;
        trace!(id = self.id(), length = declared, "received message");
        Ok(())
    }

    /// Append `blob` at the end of the content.
    ///
    /// Fails without writing anything if the content would exceed
    /// [`MAX_CONTENT_LENGTH`].
    pub fn write_blob(&mut self, blob: &[u8]) -> Result<()> {
        let length = self.content_length();
        let end = length
            .checked_add(blob.len())
            .filter(|&end| end <= MAX_CONTENT_LENGTH)
            .ok_or(FrameError::ContentTooLarge {
                size: length.saturating_add(blob.len()),
                max: MAX_CONTENT_LENGTH,
            })?;

        self.buf[HEADER_SIZE + length..HEADER_SIZE + end].copy_from_slice(blob);
        self.put_header_field(LENGTH_OFFSET, end as u32);
        Ok(())
    }

    /// Consume the next `size` content bytes.
    ///
    /// Fails without moving the read cursor if fewer than `size` bytes remain.
    pub fn read_blob(&mut self, size: usize) -> Result<&[u8]> {
        let length = self.content_length();
        let start = self.read_cursor;
        let end = start
            .checked_add(size)
            .filter(|&end| end <= length)
            .ok_or(FrameError::ReadPastEnd {
                offset: start,
                requested: size,
                length,
            })?;

        self.read_cursor = end;
        Ok(&self.buf[HEADER_SIZE + start..HEADER_SIZE + end])
    }

    /// Append `value` followed by a zero terminator.
    ///
    /// An empty value is stored as a single zero byte. Values containing a
    /// zero byte are rejected since they could not be read back whole.
    pub fn write_string(&mut self, value: impl AsRef<[u8]>) -> Result<()> {
        let value = value.as_ref();
        if let Some(offset) = value.iter().position(|&b| b == 0) {
            return Err(FrameError::InteriorNul { offset });
        }

        let needed = value.len().saturating_add(1);
        if needed > self.remaining() {
            return Err(FrameError::ContentTooLarge {
                size: self.content_length().saturating_add(needed),
                max: MAX_CONTENT_LENGTH,
            });
        }

        self.write_blob(value)?;
        self.write_blob(&[0])
    }

    /// Consume a zero-terminated string and return it without the terminator.
    ///
    /// Fails without moving the read cursor if no terminator appears before
    /// the content length.
    pub fn read_string(&mut self) -> Result<&[u8]> {
        let start = self.read_cursor;
        let terminator = self.content()[start..]
            .iter()
            .position(|&b| b == 0)
            .ok_or(FrameError::UnterminatedString { offset: start })?;

        self.read_cursor = start + terminator + 1;
        Ok(&self.buf[HEADER_SIZE + start..HEADER_SIZE + start + terminator])
    }

    /// Append a little-endian u32.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_blob(&value.to_le_bytes())
    }

    /// Consume a little-endian u32.
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_blob(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn header_field(&self, offset: usize) -> u32 {
        u32::from_le_bytes([
            self.buf[offset],
            self.buf[offset + 1],
            self.buf[offset + 2],
            self.buf[offset + 3],
        ])
    }

    fn put_header_field(&mut self, offset: usize, value: u32) {
        self.buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("id", &self.id())
            .field("content_length", &self.content_length())
            .field("read_cursor", &self.read_cursor)
            .finish()
    }
}
