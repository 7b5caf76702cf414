//! HTTP/1.1 message framing.
//!
//! This module turns a stream of bytes into a [`Request`](request::Request)
//! and writes responses back, one request per connection.
//!
//! # Architecture
//!
//! - **`headers`**: case-insensitive header map with an incremental line parser
//! - **`parser`**: the request state machine, fed from a growing buffer
//! - **`buffer`**: the bounded scratch buffer the driver reads into
//! - **`connection`**: reads one request from a socket and dispatches it
//! - **`request`** / **`response`**: the data types on either side
//! - **`writer`**: ordered status line / headers / body output, with chunked bodies
//! - **`handler`**: the boundary to application code
//!
//! # Parser State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │    Init     │ ← Wait for "METHOD SP TARGET SP HTTP/1.1 CRLF"
//!        └──────┬──────┘
//!               │ Request line parsed
//!               ▼
//!        ┌──────────────────┐
//!        │  ParsingHeaders  │ ← One "Name: Value CRLF" at a time
//!        └──────┬───────────┘
//!               │ Blank line
//!               ├─ Content-Length > 0 → ParsingBody
//!               └─ otherwise          → Done
//!        ┌──────────────────┐
//!        │   ParsingBody    │ ← Exactly Content-Length bytes
//!        └──────┬───────────┘
//!               ▼
//!             Done
//! ```
//!
//! Any malformed input moves the parser to `Error`, which is terminal.
//!
//! # Example
//!
//! ```ignore
//! use pennant::http::connection::read_request;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:42069").await?;
//!     let (mut socket, _addr) = listener.accept().await?;
//!     let request = read_request(&mut socket, 8192).await?;
//!     println!("{} {}", request.method(), request.target());
//!     Ok(())
//! }
//! ```

pub mod buffer;
pub mod connection;
pub mod error;
pub mod handler;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
