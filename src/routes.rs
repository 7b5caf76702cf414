//! The demo application served by the `pennant` binary.

use sha2::{Digest, Sha256};
use tokio::io::AsyncWrite;

use crate::http::error::WriteError;
use crate::http::handler::Handler;
use crate::http::headers::Headers;
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode, default_headers};
use crate::http::writer::ResponseWriter;
use crate::proxy::Upstream;

const HTTPBIN_PREFIX: &str = "/httpbin/";

const BAD_REQUEST_PAGE: &str = "<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Your request honestly kinda sucked.</p>
  </body>
</html>";

const INTERNAL_ERROR_PAGE: &str = "<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>Okay, you know what? This one is on me.</p>
  </body>
</html>";

const OK_PAGE: &str = "<html>
  <head>
    <title>200 OK</title>
  </head>
  <body>
    <h1>Success!</h1>
    <p>Your request was an absolute banger.</p>
  </body>
</html>";

/// Routes on the request target:
///
/// - `/yourproblem` → 400 page
/// - `/myproblem` → 500 page
/// - `/httpbin/<path>` → upstream `<path>` relayed as a chunked body with
///   SHA-256 and length trailers
/// - anything else → 200 page
pub struct DemoHandler {
    upstream: Upstream,
}

impl DemoHandler {
    pub fn new(upstream: Upstream) -> Self {
        Self { upstream }
    }

    async fn relay<W>(&self, writer: &mut ResponseWriter<W>, path: &str) -> Result<(), WriteError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let mut upstream = match self.upstream.get(path).await {
            Ok(res) => res,
            Err(e) => {
                tracing::warn!(path, error = %e, "upstream request failed");
                return html_page(StatusCode::InternalServerError, INTERNAL_ERROR_PAGE)
                    .write_to(writer)
                    .await;
            }
        };
        tracing::debug!(path, status = upstream.status, "relaying upstream body");

        let mut headers = default_headers(0);
        headers.remove("Content-Length");
        headers.set("Transfer-Encoding", "chunked");
        headers.set("Trailer", "X-Content-SHA256");
        headers.set("Trailer", "X-Content-Length");

        writer.write_status_line(StatusCode::Ok).await?;
        writer.write_headers(&headers).await?;

        let mut hasher = Sha256::new();
        let mut total = 0usize;
        loop {
            let chunk = match upstream.next_chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(e) => {
                    // Headers are out; end the body with what we have.
                    tracing::warn!(path, error = %e, "upstream read failed mid-body");
                    break;
                }
            };

            hasher.update(&chunk);
            total += chunk.len();
            writer.write_chunk(&chunk).await?;
        }

        writer.finish_chunks().await?;
        writer.write_trailers(&content_trailers(hasher, total)).await?;
        writer.flush().await
    }
}

impl Handler for DemoHandler {
    async fn handle<W>(&self, writer: &mut ResponseWriter<W>, request: &Request) -> Result<(), WriteError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let target = request.target();

        if let Some(path) = target.strip_prefix(HTTPBIN_PREFIX) {
            return self.relay(writer, path).await;
        }

        let response = match target {
            "/yourproblem" => html_page(StatusCode::BadRequest, BAD_REQUEST_PAGE),
            "/myproblem" => html_page(StatusCode::InternalServerError, INTERNAL_ERROR_PAGE),
            _ => html_page(StatusCode::Ok, OK_PAGE),
        };
        response.write_to(writer).await
    }
}

fn html_page(status: StatusCode, page: &str) -> Response {
    ResponseBuilder::new(status)
        .header("Content-Type", "text/html")
        .body(page.as_bytes().to_vec())
        .build()
}

/// Trailers announced by the relay: hex SHA-256 and length of the body.
pub fn content_trailers(hasher: Sha256, total: usize) -> Headers {
    let mut trailers = Headers::new();
    trailers.set("X-Content-SHA256", format!("{:x}", hasher.finalize()));
    trailers.set("X-Content-Length", total.to_string());
    trailers
}
