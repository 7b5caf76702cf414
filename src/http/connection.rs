use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::http::buffer::ReadBuffer;
use crate::http::error::ParseError;
use crate::http::handler::Handler;
use crate::http::parser::{ParserState, RequestParser};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// Reads a single request from `stream`.
///
/// Bytes are read into a buffer of at most `max_head_bytes`; the parser is
/// fed the unconsumed part after every read. Once the request line and header
/// block add up to more than `max_head_bytes`, or a single line does not fit
/// in the buffer, reading fails with [`ParseError::HeaderTooLarge`]. Body
/// bytes are consumed as they arrive, so the limit does not bound the body.
///
/// End of stream before any byte arrived is [`ParseError::ConnectionClosed`].
pub async fn read_request<R>(stream: &mut R, max_head_bytes: usize) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    let mut parser = RequestParser::new();
    let mut buffer = ReadBuffer::with_limit(max_head_bytes);

    while !parser.is_done() {
        if buffer.is_full() {
            return Err(ParseError::HeaderTooLarge {
                limit: buffer.limit(),
            });
        }

        let n = buffer
            .fill_from(stream)
            .await
            .map_err(ParseError::ReadFailure)?;
        tracing::trace!(bytes = n, buffered = buffer.len(), "read from stream");

        if n == 0 {
            return Err(match parser.state() {
                ParserState::Init if buffer.is_empty() => ParseError::ConnectionClosed,
                ParserState::ParsingBody { content_length } => ParseError::IncompleteBody {
                    expected: content_length,
                    received: parser.request().body.len(),
                },
                state => ParseError::UnexpectedEof(state),
            });
        }

        let consumed = parser.parse(buffer.filled())?;
        buffer.consume(consumed);

        if parser.head_len() > max_head_bytes {
            return Err(ParseError::HeaderTooLarge {
                limit: max_head_bytes,
            });
        }
    }

    if !buffer.is_empty() {
        tracing::debug!(bytes = buffer.len(), "discarding bytes after request");
    }

    Ok(parser.into_request())
}

/// One accepted connection: read a request, answer it, close.
pub struct Connection<S> {
    stream: S,
    max_head_bytes: usize,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S, max_head_bytes: usize) -> Self {
        Self {
            stream,
            max_head_bytes,
        }
    }

    /// Serves exactly one request with `handler`.
    ///
    /// A malformed request is answered with `400 Bad Request`; a transport
    /// failure while reading drops the connection without a response. A peer
    /// that closes without sending anything is not an error.
    pub async fn run<H: Handler>(mut self, handler: &H) -> anyhow::Result<()> {
        let request = match read_request(&mut self.stream, self.max_head_bytes).await {
            Ok(request) => request,
            Err(ParseError::ConnectionClosed) => {
                tracing::debug!("peer closed before sending a request");
                return Ok(());
            }
            Err(e) if e.is_malformed() => {
                tracing::warn!(error = %e, "rejecting malformed request");
                let mut writer = ResponseWriter::new(&mut self.stream);
                Response::bad_request().write_to(&mut writer).await?;
                self.stream.shutdown().await?;
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            method = request.method(),
            target = request.target(),
            body = request.body.len(),
            "request parsed"
        );

        let mut writer = ResponseWriter::new(&mut self.stream);
        handler.handle(&mut writer, &request).await?;
        writer.flush().await?;

        self.stream.shutdown().await?;
        Ok(())
    }
}
