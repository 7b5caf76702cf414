//! Error types for reading requests and writing responses.

use std::io;

use thiserror::Error;

use crate::http::parser::ParserState;

/// Errors raised while framing an incoming request.
///
/// None of these represent "need more bytes"; an incomplete buffer is
/// reported as `Ok(0)` by the parsers, never as an error.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed request line")]
    MalformedRequestLine,

    #[error("malformed header line")]
    MalformedHeaderLine,

    #[error("malformed header name")]
    MalformedHeaderName,

    #[error("request in error state")]
    RequestInErrorState,

    /// The request line and header block together exceed the head limit.
    #[error("request head exceeds {limit} bytes")]
    HeaderTooLarge { limit: usize },

    /// The peer closed the connection without sending a single byte.
    #[error("connection closed before a request arrived")]
    ConnectionClosed,

    #[error("connection closed while {0}")]
    UnexpectedEof(ParserState),

    #[error("connection closed after {received} of {expected} body bytes")]
    IncompleteBody { expected: usize, received: usize },

    #[error("read failed: {0}")]
    ReadFailure(#[source] io::Error),
}

impl ParseError {
    /// Whether the peer sent something we can answer with `400 Bad Request`.
    ///
    /// Transport failures are not; the connection is just dropped. Neither
    /// is a peer that closed before sending anything.
    pub fn is_malformed(&self) -> bool {
        !matches!(
            self,
            ParseError::ReadFailure(_) | ParseError::ConnectionClosed
        )
    }
}

/// Errors raised by [`ResponseWriter`](crate::http::writer::ResponseWriter).
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("unrecognized status code {0}")]
    UnrecognizedStatusCode(u16),

    #[error("{operation} called out of order")]
    OutOfOrder { operation: &'static str },

    #[error(transparent)]
    Io(#[from] io::Error),
}
