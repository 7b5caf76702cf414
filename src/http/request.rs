use crate::http::headers::Headers;

/// The first line of an HTTP request.
///
/// `method` is made of uppercase ASCII letters only and `http_version` is
/// always `"1.1"`; [`RequestParser`](crate::http::parser::RequestParser)
/// rejects anything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    /// The request method (e.g. "GET")
    pub method: String,
    /// The request target as sent (e.g. "/search?q=rust")
    pub target: String,
    /// The version without the `HTTP/` prefix
    pub http_version: String,
}

/// Represents a parsed HTTP request from a client.
///
/// The body is an opaque byte sequence. It is empty unless the request
/// declared a positive `Content-Length`, in which case it holds exactly that
/// many bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub request_line: RequestLine,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl Request {
    pub fn method(&self) -> &str {
        &self.request_line.method
    }

    pub fn target(&self) -> &str {
        &self.request_line.target
    }

    /// Retrieves a header value by name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// The declared body length.
    ///
    /// `None` when `Content-Length` is absent, not a number, or zero.
    pub fn content_length(&self) -> Option<usize> {
        declared_length(&self.headers)
    }
}

pub(crate) fn declared_length(headers: &Headers) -> Option<usize> {
    headers
        .get("content-length")
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
}

/// Builder for constructing Request objects.
///
/// Useful for exercising handlers without going through the parser.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<String>,
    target: Option<String>,
    headers: Headers,
    body: Vec<u8>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Sets the body and a matching `Content-Length` header.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self.headers
            .replace("Content-Length", self.body.len().to_string());
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            request_line: RequestLine {
                method: self.method.ok_or("method missing")?,
                target: self.target.ok_or("target missing")?,
                http_version: "1.1".to_string(),
            },
            headers: self.headers,
            body: self.body,
        })
    }
}
