//! Logs every line received on each accepted TCP connection.

use pennant::config::Config;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let cfg = Config::load()?;
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("Listening on {}", cfg.listen_addr);

    // One connection at a time, in accept order.
    loop {
        let (socket, peer) = listener.accept().await?;
        info!("connection established with {}", peer);

        let mut lines = BufReader::new(socket).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => info!("read: {}", line),
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("read error from {}: {}", peer, e);
                    break;
                }
            }
        }

        info!("connection closed with {}", peer);
    }
}
