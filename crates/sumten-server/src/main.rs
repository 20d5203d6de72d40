//! Binary TCP server for Sum Ten.

use sumten_server::config::Config;
use sumten_server::server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    info!(
        addr = %config.socket_addr_string(),
        max_clients = config.max_clients,
        round_seconds = config.round_seconds,
        board_mode = ?config.board_mode,
        "starting sumten-server"
    );

    server::run(config).await
}
