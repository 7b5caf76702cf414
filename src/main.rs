use pennant::config::Config;
use pennant::proxy::Upstream;
use pennant::routes::DemoHandler;
use pennant::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(cfg.tracing_level())
        .init();

    let upstream = Upstream::new(&cfg.upstream, cfg.upstream_connect_timeout())?;
    let server = Server::bind(&cfg, DemoHandler::new(upstream)).await?;

    shutdown_signal().await?;
    tracing::info!("Shutdown signal received");

    server.close()?;
    server.stopped().await;
    tracing::info!("Server gracefully stopped");

    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() -> anyhow::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res?,
        _ = term.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> anyhow::Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
