//! Read-only ledger queries
//!
//! All methods are side-effect free and may be called concurrently.

use apwine_core::{Address, Amount, PoolId, TokenKind};
use async_trait::async_trait;

use crate::Result;

/// Router price quotes
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Output obtained for a fixed `amount_in` along the given path
    async fn quote_out(
        &self,
        amm: &Address,
        side_index_path: &[u8],
        pool_path: &[PoolId],
        amount_in: &Amount,
    ) -> Result<Amount>;

    /// Input required for a fixed `amount_out` along the given path
    async fn quote_in(
        &self,
        amm: &Address,
        side_index_path: &[u8],
        pool_path: &[PoolId],
        amount_out: &Amount,
    ) -> Result<Amount>;
}

/// ERC-20 allowances and ERC-1155 operator approvals
#[async_trait]
pub trait AllowanceReader: Send + Sync {
    async fn allowance(&self, owner: &Address, spender: &Address, token: &Address)
        -> Result<Amount>;

    async fn is_approved_for_all(
        &self,
        owner: &Address,
        operator: &Address,
        collection: &Address,
    ) -> Result<bool>;
}

/// Contract wiring of an AMM
#[async_trait]
pub trait TokenDirectory: Send + Sync {
    /// Token contract behind `kind`, or `None` if the AMM does not expose one
    async fn token_address(&self, amm: &Address, kind: TokenKind) -> Result<Option<Address>>;

    /// LP token collection (ERC-1155) of the AMM
    async fn pool_token_address(&self, amm: &Address) -> Result<Address>;

    async fn current_period_index(&self, amm: &Address) -> Result<u64>;

    async fn amm_id(&self, amm: &Address) -> Result<u64>;

    /// LP token id for one pool of one period
    async fn lp_token_id(
        &self,
        amm: &Address,
        amm_id: u64,
        period_index: u64,
        pool: PoolId,
    ) -> Result<Amount>;
}

/// Registry, future vault and controller views
#[async_trait]
pub trait VaultReader: Send + Sync {
    async fn future_vault_count(&self, registry: &Address) -> Result<u64>;

    async fn future_vault_at(&self, registry: &Address, index: u64) -> Result<Address>;

    async fn controller_address(&self, registry: &Address) -> Result<Address>;

    async fn ibt_address(&self, vault: &Address) -> Result<Address>;

    async fn pt_address(&self, vault: &Address) -> Result<Address>;

    /// FYT of the vault's current period
    async fn fyt_address(&self, vault: &Address) -> Result<Address>;

    /// Period length in seconds
    async fn period_duration(&self, vault: &Address) -> Result<u64>;

    async fn platform_name(&self, vault: &Address) -> Result<String>;

    async fn next_period_index(&self, vault: &Address) -> Result<u64>;

    async fn deposits_paused(&self, controller: &Address, vault: &Address) -> Result<bool>;

    async fn withdrawals_paused(&self, controller: &Address, vault: &Address) -> Result<bool>;

    /// Unix timestamp at which the next period of length `period_duration` starts
    async fn next_period_start(&self, controller: &Address, period_duration: u64) -> Result<u64>;
}

/// Everything the SDK reads, as one object-safe bundle
pub trait ChainReader: QuoteProvider + AllowanceReader + TokenDirectory + VaultReader {}

impl<T> ChainReader for T where T: QuoteProvider + AllowanceReader + TokenDirectory + VaultReader {}
