//! AMM Client
//!
//! Long-lived entry point holding the configuration, a shared ledger reader
//! and the current signer. Per-call parameters left unset fall back to the
//! configured defaults.

use std::sync::Arc;
use std::time::Duration;

use apwine_core::{Address, AppConfig, Amount, Deadline, Network, PoolId, TokenKind};
use ledger_client::{ChainReader, IdentityResolver, Signer, SignerBinding, TransactionHandle};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::info;

use crate::approval::ApprovalGate;
use crate::fetch::{self, LpTokenPool};
use crate::liquidity::LiquidityOperations;
use crate::router;
use crate::state::{
    LiquidityRequest, SwapDirection, SwapError, SwapOptions, SwapPlan, SwapRequest,
};
use crate::swap::SwapExecutor;

/// Swap parameters; unset fields use the client configuration
#[derive(Debug, Clone)]
pub struct SwapParams {
    pub amm: Address,
    pub from: TokenKind,
    pub to: TokenKind,
    pub amount: Amount,
    pub slippage_tolerance: Option<Decimal>,
    pub deadline: Option<Deadline>,
}

/// Liquidity parameters; the signer comes from the client
#[derive(Debug, Clone)]
pub struct LiquidityParams {
    pub amm: Address,
    pub pool: PoolId,
    pub amount: Amount,
    pub bounding_amounts: Option<[Amount; 2]>,
    pub account: Option<Address>,
}

/// Configuration together with the router it was validated to name
#[derive(Debug, Clone)]
struct Settings {
    config: AppConfig,
    router: Address,
}

impl Settings {
    fn new(config: AppConfig) -> apwine_core::Result<Self> {
        let router = config.router()?.clone();
        Ok(Self { config, router })
    }
}

pub struct AmmClient {
    settings: RwLock<Settings>,
    reader: Arc<dyn ChainReader>,
    signer: RwLock<SignerBinding>,
}

impl AmmClient {
    /// Read-only client. Fails when the configuration names no router.
    pub fn new(config: AppConfig, reader: Arc<dyn ChainReader>) -> apwine_core::Result<Self> {
        Ok(Self {
            settings: RwLock::new(Settings::new(config)?),
            reader,
            signer: RwLock::new(SignerBinding::Unbound),
        })
    }

    pub fn with_signer(self, signer: Arc<dyn Signer>) -> Self {
        Self {
            signer: RwLock::new(SignerBinding::bound(signer)),
            ..self
        }
    }

    pub async fn update_signer(&self, signer: Arc<dyn Signer>) {
        *self.signer.write().await = SignerBinding::bound(signer);
        info!("Signer updated");
    }

    pub async fn clear_signer(&self) {
        *self.signer.write().await = SignerBinding::Unbound;
    }

    /// Replace the configuration. Rejected configurations leave the current
    /// one in place.
    pub async fn update_config(&self, config: AppConfig) -> apwine_core::Result<()> {
        let settings = Settings::new(config)?;
        info!(network = %settings.config.network, router = %settings.router, "Config updated");
        *self.settings.write().await = settings;
        Ok(())
    }

    pub async fn config(&self) -> AppConfig {
        self.settings.read().await.config.clone()
    }

    pub async fn network(&self) -> Network {
        self.settings.read().await.config.network
    }

    pub fn how_to_swap(&self, from: TokenKind, to: TokenKind) -> Result<SwapPlan, SwapError> {
        router::how_to_swap(from, to).ok_or_else(|| SwapError::invalid_route(from, to))
    }

    pub async fn swap_in(
        &self,
        params: SwapParams,
        options: SwapOptions,
    ) -> Result<TransactionHandle, SwapError> {
        self.swap(SwapDirection::In, params, options).await
    }

    pub async fn swap_out(
        &self,
        params: SwapParams,
        options: SwapOptions,
    ) -> Result<TransactionHandle, SwapError> {
        self.swap(SwapDirection::Out, params, options).await
    }

    async fn swap(
        &self,
        direction: SwapDirection,
        params: SwapParams,
        options: SwapOptions,
    ) -> Result<TransactionHandle, SwapError> {
        let Settings { config, router } = self.settings.read().await.clone();
        let request = SwapRequest {
            amm: params.amm,
            from: params.from,
            to: params.to,
            amount: params.amount,
            slippage_tolerance: params
                .slippage_tolerance
                .unwrap_or(config.default_slippage_percent),
            deadline: Some(
                params
                    .deadline
                    .unwrap_or_else(|| Deadline::after(Duration::from_secs(config.deadline_secs))),
            ),
            signer: self.signer.read().await.clone(),
        };

        SwapExecutor::new(self.reader.as_ref(), &router)
            .swap(direction, &request, options)
            .await
    }

    pub async fn add_liquidity(
        &self,
        params: LiquidityParams,
        options: SwapOptions,
    ) -> Result<TransactionHandle, SwapError> {
        let request = self.liquidity_request(params).await;
        LiquidityOperations::new(self.reader.as_ref())
            .add_liquidity(&request, options)
            .await
    }

    pub async fn remove_liquidity(
        &self,
        params: LiquidityParams,
        options: SwapOptions,
    ) -> Result<TransactionHandle, SwapError> {
        let request = self.liquidity_request(params).await;
        LiquidityOperations::new(self.reader.as_ref())
            .remove_liquidity(&request, options)
            .await
    }

    async fn liquidity_request(&self, params: LiquidityParams) -> LiquidityRequest {
        LiquidityRequest {
            amm: params.amm,
            pool: params.pool,
            amount: params.amount,
            bounding_amounts: params.bounding_amounts,
            account: params.account,
            signer: self.signer.read().await.clone(),
        }
    }

    pub async fn fetch_lp_token_pool(
        &self,
        amm: &Address,
        pool: PoolId,
        period_index: Option<u64>,
    ) -> Result<LpTokenPool, SwapError> {
        Ok(fetch::fetch_lp_token_pool(self.reader.as_ref(), amm, pool, period_index).await?)
    }

    pub async fn fetch_all_lp_token_pools(
        &self,
        amm: &Address,
    ) -> Result<Vec<LpTokenPool>, SwapError> {
        Ok(fetch::fetch_all_lp_token_pools(self.reader.as_ref(), amm).await?)
    }

    /// Whether `amm` may move every LP token of `account` (the signer when
    /// not given)
    pub async fn is_lp_approved_for_all(
        &self,
        amm: &Address,
        account: Option<Address>,
    ) -> Result<bool, SwapError> {
        let account = match account {
            Some(account) => account,
            None => {
                let binding = self.signer.read().await.clone();
                let signer = binding.signer().ok_or(SwapError::NoSigner)?;
                signer.signer_address().await?
            }
        };
        Ok(fetch::is_lp_approved_for_all(self.reader.as_ref(), amm, &account).await?)
    }

    /// Grant or revoke the AMM's operator approval over the signer's LP tokens
    pub async fn approve_lp_for_all(
        &self,
        amm: &Address,
        approved: bool,
    ) -> Result<TransactionHandle, SwapError> {
        let binding = self.signer.read().await.clone();
        let signer = binding.signer().ok_or(SwapError::NoSigner)?;
        ApprovalGate::new(self.reader.as_ref(), &**signer)
            .approve_lp_for_all(amm, approved)
            .await
    }
}
