//! Vault State Types

use apwine_core::{Address, TransportError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything the registry and controller report about one future vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutureAggregate {
    pub address: Address,
    /// Interest-bearing token deposited into the vault
    pub ibt_address: Address,
    pub pt_address: Address,
    /// Period length in seconds
    pub period_duration: u64,
    pub platform: String,
    pub deposits_paused: bool,
    pub withdrawals_paused: bool,
    pub next_period_index: u64,
    /// Unix seconds
    pub next_period_timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    #[error("No signer bound for a mutating call")]
    NoSigner,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl VaultError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoSigner => "NoSigner",
            Self::Transport(_) => "Transport",
        }
    }
}
