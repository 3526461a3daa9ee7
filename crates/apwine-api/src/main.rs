//! apwine-server: standalone HTTP API
//!
//! Reads its configuration from the JSON file named by `APWINE_CONFIG`,
//! falling back to defaults. Log filtering follows `RUST_LOG`.

use anyhow::Context;
use apwine_api::{start_server, AppState};
use apwine_core::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::var("APWINE_CONFIG") {
        Ok(path) => AppConfig::load(&path).with_context(|| format!("loading config {}", path))?,
        Err(_) => {
            tracing::info!("APWINE_CONFIG not set, using defaults");
            AppConfig::default()
        }
    };

    let port = config.api_port;
    start_server(AppState::with_config(config), port)
        .await
        .context("API server failed")?;
    Ok(())
}
