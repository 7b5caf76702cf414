use std::future::Future;

use tokio::io::AsyncWrite;

use crate::http::error::WriteError;
use crate::http::request::Request;
use crate::http::writer::ResponseWriter;

/// Produces the response for a parsed request.
///
/// Implementations choose the status code, headers and body and write them
/// through `writer`, in order. The connection is closed once `handle`
/// returns.
pub trait Handler: Send + Sync + 'static {
    fn handle<W>(
        &self,
        writer: &mut ResponseWriter<W>,
        request: &Request,
    ) -> impl Future<Output = Result<(), WriteError>> + Send
    where
        W: AsyncWrite + Unpin + Send;
}
