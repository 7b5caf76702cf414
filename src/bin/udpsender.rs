//! Sends each line typed on stdin as a UDP datagram.

use anyhow::Context;
use pennant::config::Config;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UdpSocket;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let cfg = Config::load()?;
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket
        .connect(&cfg.listen_addr)
        .await
        .with_context(|| format!("resolving {}", cfg.listen_addr))?;

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        if let Err(e) = socket.send(format!("{}\n", line).as_bytes()).await {
            tracing::error!("send failed: {}", e);
        }
    }

    Ok(())
}
