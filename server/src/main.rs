//! Diploma server binary entry point

use anyhow::Context;
use diploma_server::{init_tracing, start_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("reading configuration")?;
    init_tracing(config.default_log_filter());

    tracing::info!("Starting diploma generation service ({})", config.app_env);
    start_server(config).await.context("server stopped")?;

    Ok(())
}
