//! Web server binary for the QR style forms.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use qrstyle::config::ServerConfig;
use qrstyle::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env values act as environment defaults for the flags below.
    dotenvy::dotenv().ok();
    let config = ServerConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    config.validate().context("invalid configuration")?;
    tracing::info!(
        box_size = config.box_size,
        border = config.border,
        max_upload_bytes = config.max_upload_bytes,
        "Starting QR style server"
    );

    server::start_server(&config).await
}
