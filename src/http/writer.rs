use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::error::WriteError;
use crate::http::headers::Headers;
use crate::http::response::StatusCode;

const HTTP_VERSION: &str = "HTTP/1.1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    StatusLine,
    Headers,
    Body,
    Trailers,
    Finished,
}

/// Renders the status line for `status`.
pub fn encode_status_line(status: StatusCode) -> String {
    format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        status.as_u16(),
        status.reason_phrase()
    )
}

/// Renders a header block, including the blank line that ends it.
pub fn encode_headers(headers: &Headers) -> Vec<u8> {
    let mut buf = Vec::new();

    for (name, value) in headers.iter() {
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(value.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    buf.extend_from_slice(b"\r\n");
    buf
}

/// Frames one fragment as a chunk: `<hex-size>\r\n<data>\r\n`.
pub fn encode_chunk(data: &[u8]) -> Vec<u8> {
    let mut buf = format!("{:x}\r\n", data.len()).into_bytes();
    buf.extend_from_slice(data);
    buf.extend_from_slice(b"\r\n");
    buf
}

/// Writes a response to `inner` one part at a time.
///
/// Parts must come in wire order: status line, headers, then either body
/// bytes or chunks. A chunked body is closed with [`finish_chunks`] and
/// [`write_trailers`]. Calling an operation out of order fails with
/// [`WriteError::OutOfOrder`] and writes nothing.
///
/// [`finish_chunks`]: ResponseWriter::finish_chunks
/// [`write_trailers`]: ResponseWriter::write_trailers
pub struct ResponseWriter<W> {
    inner: W,
    stage: Stage,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            stage: Stage::StatusLine,
        }
    }

    pub async fn write_status_line(&mut self, code: impl Into<u16>) -> Result<(), WriteError> {
        self.expect(Stage::StatusLine, "write_status_line")?;
        let status = StatusCode::from_u16(code.into())?;

        self.inner
            .write_all(encode_status_line(status).as_bytes())
            .await?;
        self.stage = Stage::Headers;
        Ok(())
    }

    /// Writes every header as `name: value` followed by a blank line.
    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), WriteError> {
        self.expect(Stage::Headers, "write_headers")?;

        self.inner.write_all(&encode_headers(headers)).await?;
        self.stage = Stage::Body;
        Ok(())
    }

    /// Writes raw body bytes. May be called repeatedly.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, WriteError> {
        self.expect(Stage::Body, "write_body")?;

        self.inner.write_all(body).await?;
        Ok(body.len())
    }

    /// Writes `data` as one chunk of a chunked body.
    ///
    /// An empty fragment writes nothing, since a zero-size chunk ends the body.
    pub async fn write_chunk(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        self.expect(Stage::Body, "write_chunk")?;
        if data.is_empty() {
            return Ok(0);
        }

        self.inner.write_all(&encode_chunk(data)).await?;
        Ok(data.len())
    }

    /// Writes the terminating `0\r\n` chunk.
    ///
    /// Must be followed by [`write_trailers`](Self::write_trailers), with an
    /// empty map if there are none, to emit the final blank line.
    pub async fn finish_chunks(&mut self) -> Result<(), WriteError> {
        self.expect(Stage::Body, "finish_chunks")?;

        self.inner.write_all(b"0\r\n").await?;
        self.stage = Stage::Trailers;
        Ok(())
    }

    /// Writes the trailer fields and the blank line ending the message.
    ///
    /// Names should have been announced in a `Trailer` response header.
    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<(), WriteError> {
        self.expect(Stage::Trailers, "write_trailers")?;

        self.inner.write_all(&encode_headers(trailers)).await?;
        self.stage = Stage::Finished;
        Ok(())
    }

    pub async fn flush(&mut self) -> Result<(), WriteError> {
        self.inner.flush().await?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn expect(&self, stage: Stage, operation: &'static str) -> Result<(), WriteError> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(WriteError::OutOfOrder { operation })
        }
    }
}
