//! Liquidity Operations
//!
//! Adding liquidity spends both tokens of a pool and needs an ERC-20
//! allowance on each; without auto-approve the call goes out as is and the
//! AMM enforces the allowance. Removing it burns LP tokens, which the AMM
//! moves as an ERC-1155 operator.

use apwine_core::{Address, Amount};
use ledger_client::{
    ChainReader, IdentityResolver, Signer, TokenDirectory, TransactionHandle, TransactionSubmitter,
};
use num_traits::Zero;
use tracing::{info, warn};

use crate::approval::{resolve_token, ApprovalGate};
use crate::constants::liquidity::max_int256;
use crate::state::{LiquidityRequest, SwapError, SwapOptions};

pub struct LiquidityOperations<'a> {
    reader: &'a dyn ChainReader,
}

impl<'a> LiquidityOperations<'a> {
    pub fn new(reader: &'a dyn ChainReader) -> Self {
        Self { reader }
    }

    /// Mint `request.amount` LP tokens of `request.pool`.
    ///
    /// Bounding amounts are the most PT and paired token the caller will
    /// spend, unlimited when not given.
    pub async fn add_liquidity(
        &self,
        request: &LiquidityRequest,
        options: SwapOptions,
    ) -> Result<TransactionHandle, SwapError> {
        let signer = request.signer.signer().ok_or_else(|| {
            warn!(pool = %request.pool, "Add liquidity rejected: no signer");
            SwapError::NoSigner
        })?;
        let owner = acting_account(request, &**signer).await?;
        let max_amounts_in = request
            .bounding_amounts
            .clone()
            .unwrap_or_else(|| [max_int256(), max_int256()]);

        if options.auto_approve {
            let [first, second] = request.pool.tokens();
            let (first, second) = tokio::try_join!(
                resolve_token(self.reader, &request.amm, first),
                resolve_token(self.reader, &request.amm, second),
            )?;

            let gate = ApprovalGate::new(self.reader, &**signer);
            for (token, max_in) in [first, second].iter().zip(&max_amounts_in) {
                gate.ensure_allowance(&owner, &request.amm, token, max_in)
                    .await?;
            }
        }

        let tx = signer
            .add_liquidity(&request.amm, request.pool, &request.amount, &max_amounts_in)
            .await?;
        info!(pool = %request.pool, amount = %request.amount, tx = %tx, "Liquidity added");
        Ok(tx)
    }

    /// Burn `request.amount` LP tokens of `request.pool`.
    ///
    /// Bounding amounts are the least PT and paired token the caller will
    /// accept, zero when not given.
    pub async fn remove_liquidity(
        &self,
        request: &LiquidityRequest,
        options: SwapOptions,
    ) -> Result<TransactionHandle, SwapError> {
        let signer = request.signer.signer().ok_or_else(|| {
            warn!(pool = %request.pool, "Remove liquidity rejected: no signer");
            SwapError::NoSigner
        })?;
        let owner = acting_account(request, &**signer).await?;
        let min_amounts_out = request
            .bounding_amounts
            .clone()
            .unwrap_or_else(|| [Amount::zero(), Amount::zero()]);

        let collection = self.reader.pool_token_address(&request.amm).await?;
        let gate = ApprovalGate::new(self.reader, &**signer);
        if options.auto_approve {
            gate.ensure_operator_approval(&owner, &request.amm, &collection)
                .await?;
        } else if !gate
            .has_operator_approval(&owner, &request.amm, &collection)
            .await?
        {
            warn!(%collection, %owner, "Remove liquidity rejected: AMM not an approved operator");
            return Err(SwapError::LpRemovalNotApproved);
        }

        let tx = signer
            .remove_liquidity(
                &request.amm,
                request.pool,
                &request.amount,
                &min_amounts_out,
                &owner,
            )
            .await?;
        info!(pool = %request.pool, amount = %request.amount, tx = %tx, "Liquidity removed");
        Ok(tx)
    }
}

async fn acting_account(
    request: &LiquidityRequest,
    signer: &dyn Signer,
) -> Result<Address, SwapError> {
    match &request.account {
        Some(account) => Ok(account.clone()),
        None => Ok(signer.signer_address().await?),
    }
}
