use std::fmt;

use crate::http::error::ParseError;
use crate::http::headers::find_crlf;
use crate::http::request::{Request, RequestLine, declared_length};

const CRLF_LEN: usize = 2;
const HTTP_VERSION: &[u8] = b"HTTP/1.1";

/// Where a [`RequestParser`] is in the request.
///
/// States only move forward. `Done` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Init,
    ParsingHeaders,
    /// Waiting for `content_length` body bytes in total.
    ParsingBody { content_length: usize },
    Done,
    Error,
}

impl fmt::Display for ParserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserState::Init => write!(f, "reading request line"),
            ParserState::ParsingHeaders => write!(f, "reading headers"),
            ParserState::ParsingBody { .. } => write!(f, "reading body"),
            ParserState::Done => write!(f, "done"),
            ParserState::Error => write!(f, "in error state"),
        }
    }
}

/// Incremental request parser.
///
/// Feed it the unconsumed part of a growing buffer with [`parse`]; it reports
/// how many bytes it took and never waits for more. Bytes it did not consume
/// must be presented again, with new data appended, on the next call.
///
/// [`parse`]: RequestParser::parse
#[derive(Debug)]
pub struct RequestParser {
    state: ParserState,
    request: Request,
    head_len: usize,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Init,
            request: Request::default(),
            head_len: 0,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ParserState::Done
    }

    /// Bytes consumed so far by the request line and header block.
    pub fn head_len(&self) -> usize {
        self.head_len
    }

    /// The request assembled so far.
    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn into_request(self) -> Request {
        self.request
    }

    /// Consumes as much of `data` as the current state allows.
    ///
    /// Returns the number of bytes consumed, which may be zero when `data`
    /// holds no complete line yet. Any error moves the parser to
    /// [`ParserState::Error`], after which every call fails with
    /// [`ParseError::RequestInErrorState`].
    pub fn parse(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        let mut read = 0;

        loop {
            let rest = &data[read..];

            match self.state {
                ParserState::Error => return Err(ParseError::RequestInErrorState),

                ParserState::Init => {
                    let parsed = parse_request_line(rest).inspect_err(|_| {
                        self.state = ParserState::Error;
                    })?;
                    let Some((request_line, n)) = parsed else {
                        break;
                    };

                    self.request.request_line = request_line;
                    self.head_len += n;
                    read += n;
                    self.transition(ParserState::ParsingHeaders);
                }

                ParserState::ParsingHeaders => {
                    let (n, done) = self.request.headers.parse(rest).inspect_err(|_| {
                        self.state = ParserState::Error;
                    })?;
                    self.head_len += n;
                    read += n;

                    if done {
                        let next = match declared_length(&self.request.headers) {
                            Some(content_length) => ParserState::ParsingBody { content_length },
                            None => ParserState::Done,
                        };
                        self.transition(next);
                    } else {
                        break;
                    }
                }

                ParserState::ParsingBody { content_length } => {
                    let wanted = content_length - self.request.body.len();
                    let take = wanted.min(rest.len());
                    if take == 0 {
                        break;
                    }

                    self.request.body.extend_from_slice(&rest[..take]);
                    read += take;

                    if self.request.body.len() == content_length {
                        self.transition(ParserState::Done);
                    }
                }

                ParserState::Done => break,
            }
        }

        Ok(read)
    }

    fn transition(&mut self, next: ParserState) {
        tracing::trace!(from = %self.state, to = %next, "parser state change");
        self.state = next;
    }
}

/// Parses `METHOD SP TARGET SP HTTP/1.1 CRLF` from the front of `buf`.
///
/// Returns `Ok(None)` if no CRLF has arrived yet, otherwise the request line
/// and the number of bytes it occupied including the CRLF.
pub fn parse_request_line(buf: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(idx) = find_crlf(buf) else {
        return Ok(None);
    };

    let line = &buf[..idx];
    let parts: Vec<&[u8]> = line.split(|&c| c == b' ').collect();

    let [method, target, version] = parts.as_slice() else {
        return Err(ParseError::MalformedRequestLine);
    };

    if method.is_empty() || !method.iter().all(u8::is_ascii_uppercase) {
        return Err(ParseError::MalformedRequestLine);
    }
    if target.is_empty() {
        return Err(ParseError::MalformedRequestLine);
    }
    if *version != HTTP_VERSION {
        return Err(ParseError::MalformedRequestLine);
    }

    let target = std::str::from_utf8(target).map_err(|_| ParseError::MalformedRequestLine)?;

    let request_line = RequestLine {
        // Validated as ASCII uppercase above.
        method: String::from_utf8_lossy(method).into_owned(),
        target: target.to_string(),
        http_version: "1.1".to_string(),
    };

    Ok(Some((request_line, idx + CRLF_LEN)))
}
