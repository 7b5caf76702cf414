use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::handler::Handler;

/// Pause after a failed `accept`, so errors such as running out of file
/// descriptors do not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server already closed")]
    AlreadyClosed,
}

/// A running accept loop.
///
/// Every accepted connection is served on its own task. [`close`] stops
/// accepting; connections already being served run to completion.
///
/// [`close`]: Server::close
pub struct Server {
    local_addr: SocketAddr,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    accept_task: JoinHandle<()>,
}

impl Server {
    /// Binds `cfg.listen_addr` and starts accepting in the background.
    pub async fn bind<H: Handler>(cfg: &Config, handler: H) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(&cfg.listen_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("Listening on {}", local_addr);

        let running = Arc::new(AtomicBool::new(true));
        let shutdown = Arc::new(Notify::new());

        let accept_task = tokio::spawn(accept_loop(
            listener,
            Arc::new(handler),
            Arc::clone(&running),
            Arc::clone(&shutdown),
            cfg.max_head_bytes,
        ));

        Ok(Self {
            local_addr,
            running,
            shutdown,
            accept_task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stops accepting connections and releases the listening socket.
    ///
    /// Only the first call succeeds; later calls return
    /// [`ServerError::AlreadyClosed`].
    pub fn close(&self) -> Result<(), ServerError> {
        if self
            .running
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ServerError::AlreadyClosed);
        }

        self.shutdown.notify_one();
        info!("Server closing");
        Ok(())
    }

    /// Waits for the accept loop to exit after [`close`](Self::close).
    pub async fn stopped(self) {
        if let Err(e) = self.accept_task.await {
            tracing::error!("accept loop panicked: {}", e);
        }
    }
}

async fn accept_loop<H: Handler>(
    listener: TcpListener,
    handler: Arc<H>,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    max_head_bytes: usize,
) {
    loop {
        let (socket, peer) = tokio::select! {
            res = listener.accept() => match res {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::error!("accept failed: {}", e);
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            },
            _ = shutdown.notified() => break,
        };
        info!("Accepted connection from {}", peer);

        let handler = Arc::clone(&handler);
        let running = Arc::clone(&running);
        tokio::spawn(async move {
            if !running.load(Ordering::SeqCst) {
                tracing::debug!("server closed, dropping connection from {}", peer);
                return;
            }

            let conn = Connection::new(socket, max_head_bytes);
            if let Err(e) = conn.run(handler.as_ref()).await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }

    info!("Listener closed");
}
