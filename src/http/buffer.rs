//! Bounded read buffer for the connection driver.

use bytes::{Buf, BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

/// A scratch buffer that holds unparsed bytes, up to a fixed limit.
///
/// Bytes are appended at the tail by [`fill_from`] and released from the
/// front by [`consume`]; the space they occupied is reused by later reads.
///
/// [`fill_from`]: ReadBuffer::fill_from
/// [`consume`]: ReadBuffer::consume
#[derive(Debug)]
pub struct ReadBuffer {
    buf: BytesMut,
    limit: usize,
}

impl ReadBuffer {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(limit),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Unconsumed bytes, oldest first.
    pub fn filled(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// True when no further bytes can be read without consuming some first.
    pub fn is_full(&self) -> bool {
        self.buf.len() >= self.limit
    }

    /// Drops `n` bytes from the front.
    pub fn consume(&mut self, n: usize) {
        self.buf.advance(n);
    }

    /// Reads once from `reader` into the free tail.
    ///
    /// Returns the number of bytes read; zero means end of stream (or a full
    /// buffer, which callers check first).
    pub async fn fill_from<R>(&mut self, reader: &mut R) -> std::io::Result<usize>
    where
        R: AsyncRead + Unpin,
    {
        let free = self.limit.saturating_sub(self.buf.len());
        if free == 0 {
            return Ok(0);
        }

        // Reclaims the consumed prefix before growing.
        self.buf.reserve(free);
        let mut tail = (&mut self.buf).limit(free);
        reader.read_buf(&mut tail).await
    }
}
