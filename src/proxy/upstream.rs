//! Upstream connection and response streaming
//!
//! This module fetches a resource from an upstream HTTP server so a handler
//! can relay its body piece by piece without knowing the length up front.

use std::time::Duration;

use anyhow::{Context, Result};
use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use url::Url;

use crate::http::headers::{Headers, find_crlf};

/// Default buffer size for streaming
const BUFFER_SIZE: usize = 8192;

/// Largest upstream status line plus headers we accept.
const MAX_HEAD_BYTES: usize = 64 * 1024;

/// Fetches resources from a fixed upstream base URL.
#[derive(Debug, Clone)]
pub struct Upstream {
    base: Url,
    connect_timeout: Duration,
}

/// An upstream response whose head has been read and whose body is still
/// on the wire.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: u16,
    pub headers: Headers,
    stream: TcpStream,
    pending: BytesMut,
}

impl Upstream {
    pub fn new(base: &str, connect_timeout: Duration) -> Result<Self> {
        let base = Url::parse(base).context("Invalid upstream URL")?;
        if base.scheme() != "http" {
            anyhow::bail!("unsupported upstream scheme {}", base.scheme());
        }
        Ok(Self {
            base,
            connect_timeout,
        })
    }

    /// Resolves `path` against the base URL.
    ///
    /// The result always has the base's scheme, host and port. A path that
    /// resolves anywhere else, such as an absolute or scheme-relative URL, is
    /// refused.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        let url = self
            .base
            .join(path.trim_start_matches('/'))
            .context("Invalid upstream path")?;

        if url.origin() != self.base.origin() {
            anyhow::bail!("upstream path {:?} does not stay on {}", path, self.base);
        }
        Ok(url)
    }

    /// Sends a GET for `path` and reads the response head.
    pub async fn get(&self, path: &str) -> Result<UpstreamResponse> {
        let url = self.url_for(path)?;
        let host = url.host_str().context("Upstream URL missing host")?;
        let port = url.port_or_known_default().unwrap_or(80);

        let addr = format!("{}:{}", host, port);
        let mut stream = timeout(self.connect_timeout, TcpStream::connect(&addr))
            .await
            .context("Connection timeout")?
            .context("Failed to connect to upstream")?;

        tracing::trace!(upstream = %addr, "Connected to upstream");

        stream.write_all(&build_http_request(&url)).await?;
        stream.flush().await?;

        read_response_head(stream).await
    }
}

impl UpstreamResponse {
    /// Returns the next piece of the body, or `None` once the upstream closes.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        if !self.pending.is_empty() {
            return Ok(Some(self.pending.split().freeze()));
        }

        let mut buf = BytesMut::with_capacity(BUFFER_SIZE);
        let n = self.stream.read_buf(&mut buf).await?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(buf.freeze()))
    }
}

/// Builds the request sent upstream.
///
/// HTTP/1.0 with `Connection: close`, so the body arrives unchunked and ends
/// when the upstream closes the connection.
pub fn build_http_request(url: &Url) -> Vec<u8> {
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };

    let mut headers = Headers::new();
    headers.set("Host", host);
    headers.set("User-Agent", concat!("pennant/", env!("CARGO_PKG_VERSION")));
    headers.set("Accept", "*/*");
    headers.set("Connection", "close");

    let mut buffer = format!("GET {} HTTP/1.0\r\n", target).into_bytes();
    buffer.extend_from_slice(&crate::http::writer::encode_headers(&headers));
    buffer
}

async fn read_response_head(mut stream: TcpStream) -> Result<UpstreamResponse> {
    let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);

    let status = loop {
        if let Some(idx) = find_crlf(&buffer) {
            let line = buffer.split_to(idx + 2);
            break parse_status_line(&line[..idx])?;
        }
        fill(&mut stream, &mut buffer).await?;
    };

    let mut headers = Headers::new();
    loop {
        let (n, done) = headers
            .parse(&buffer)
            .context("Malformed upstream header")?;
        let _ = buffer.split_to(n);
        if done {
            break;
        }
        fill(&mut stream, &mut buffer).await?;
    }

    Ok(UpstreamResponse {
        status,
        headers,
        stream,
        pending: buffer,
    })
}

async fn fill(stream: &mut TcpStream, buffer: &mut BytesMut) -> Result<()> {
    // Prevent unbounded header growth
    if buffer.len() > MAX_HEAD_BYTES {
        anyhow::bail!("Response headers too large");
    }

    let n = stream.read_buf(buffer).await?;
    if n == 0 {
        anyhow::bail!("Connection closed before complete response received");
    }
    Ok(())
}

/// Parses `HTTP/x.y CODE [reason]` and returns the code.
pub fn parse_status_line(line: &[u8]) -> Result<u16> {
    let line = std::str::from_utf8(line).context("Invalid UTF-8 in status line")?;
    let mut parts = line.splitn(3, ' ');

    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        anyhow::bail!("Invalid status line: {}", line);
    }

    parts
        .next()
        .context("Status line missing code")?
        .parse()
        .context("Invalid status code")
}
