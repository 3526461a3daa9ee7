//! Configuration types for APWine

use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{constants::DEFAULT_DEADLINE_SECS, Address, Error, Network};

/// JSON-RPC endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Endpoint URL (e.g., "http://127.0.0.1:8545")
    pub url: String,

    /// API key for hosted endpoints (optional)
    #[serde(default)]
    pub api_key: String,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8545".to_string(),
            api_key: String::new(),
        }
    }
}

/// Deployed protocol contracts for the selected network
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractAddresses {
    /// AMM router: quotes, swaps, and the spender for swap approvals
    #[serde(default)]
    pub amm_router: Option<Address>,

    /// Protocol registry (future vaults, controller)
    #[serde(default)]
    pub registry: Option<Address>,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// RPC connection settings
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Network (mainnet or kovan)
    pub network: Network,

    /// Contract addresses
    #[serde(default)]
    pub contracts: ContractAddresses,

    /// Slippage tolerance applied when a caller does not pass one
    #[serde(default = "default_slippage_percent")]
    pub default_slippage_percent: Decimal,

    /// Swap deadline window when a caller does not pass one
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

fn default_slippage_percent() -> Decimal {
    dec!(0.5)
}

fn default_deadline_secs() -> u64 {
    DEFAULT_DEADLINE_SECS
}

fn default_api_port() -> u16 {
    19060
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::default(),
            network: Network::Mainnet,
            contracts: ContractAddresses::default(),
            default_slippage_percent: default_slippage_percent(),
            deadline_secs: default_deadline_secs(),
            api_port: default_api_port(),
        }
    }
}

impl AppConfig {
    /// Parse a JSON config document
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    /// Router address, required for anything that swaps
    pub fn router(&self) -> crate::Result<&Address> {
        self.contracts
            .amm_router
            .as_ref()
            .ok_or_else(|| Error::Config(format!("no AMM router configured for {}", self.network)))
    }

    /// Registry address, required for future-vault queries
    pub fn registry(&self) -> crate::Result<&Address> {
        self.contracts
            .registry
            .as_ref()
            .ok_or_else(|| Error::Config(format!("no registry configured for {}", self.network)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.rpc.url, "http://127.0.0.1:8545");
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.api_port, 19060);
        assert_eq!(config.deadline_secs, 60);
        assert_eq!(config.default_slippage_percent, dec!(0.5));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = AppConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed.rpc.url, config.rpc.url);
        assert_eq!(parsed.default_slippage_percent, config.default_slippage_percent);
    }

    #[test]
    fn test_minimal_config_fills_defaults() {
        let parsed = AppConfig::from_json_str(
            r#"{
                "network": "kovan",
                "contracts": { "amm_router": "0x1604C5e9aB488D66E983644355511DCEF5c32EDF" }
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.network, Network::Kovan);
        assert_eq!(parsed.deadline_secs, 60);
        assert_eq!(
            parsed.router().unwrap().as_str(),
            "0x1604c5e9ab488d66e983644355511dcef5c32edf"
        );
        assert!(parsed.registry().is_err());
    }

    #[test]
    fn test_missing_router_is_config_error() {
        let config = AppConfig::default();
        assert!(matches!(config.router(), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = AppConfig::load("/nonexistent/apwine.json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
