//! Application state shared across API handlers

use std::sync::Arc;

use apwine_core::{AppConfig, Network};
use tokio::sync::RwLock;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RwLock<AppConfig>,
}

impl AppState {
    /// Create a new application state with default config
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create with a specific config
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config: RwLock::new(config),
            }),
        }
    }

    /// Get current config
    pub async fn config(&self) -> AppConfig {
        self.inner.config.read().await.clone()
    }

    /// Replace the config
    pub async fn set_config(&self, config: AppConfig) {
        tracing::info!("Config replaced, network {}", config.network);
        *self.inner.config.write().await = config;
    }

    /// Get current network
    pub async fn network(&self) -> Network {
        self.inner.config.read().await.network
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
