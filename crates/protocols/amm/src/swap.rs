//! Swap Executor
//!
//! Drives one swap through path resolution, quoting, slippage bounding,
//! optional approval and submission. Each step is awaited in order; the
//! first failure is returned and nothing after it runs.

use std::time::Duration;

use apwine_core::constants::DEFAULT_DEADLINE_SECS;
use apwine_core::{Address, Deadline};
use ledger_client::{
    ChainReader, IdentityResolver, QuoteProvider, SwapCall, TransactionHandle, TransactionSubmitter,
};
use tracing::{debug, info, warn};

use crate::approval::ApprovalGate;
use crate::calculator::{protected_bound, validate_tolerance};
use crate::router::resolve_swap_path;
use crate::state::{SwapDirection, SwapError, SwapOptions, SwapRequest};

/// Swaps routed through one router contract
pub struct SwapExecutor<'a> {
    reader: &'a dyn ChainReader,
    router: &'a Address,
}

impl<'a> SwapExecutor<'a> {
    pub fn new(reader: &'a dyn ChainReader, router: &'a Address) -> Self {
        Self { reader, router }
    }

    /// Execute `request` as an exact-in (`In`) or exact-out (`Out`) swap.
    ///
    /// Rejections that need no ledger data (missing signer, no route, bad
    /// tolerance) happen before any call is issued.
    pub async fn swap(
        &self,
        direction: SwapDirection,
        request: &SwapRequest,
        options: SwapOptions,
    ) -> Result<TransactionHandle, SwapError> {
        let signer = request.signer.signer().ok_or_else(|| {
            warn!(%direction, "Swap rejected: no signer");
            SwapError::NoSigner
        })?;

        let path = resolve_swap_path(request.from, request.to).ok_or_else(|| {
            warn!(from = %request.from, to = %request.to, "Swap rejected: no route");
            SwapError::invalid_route(request.from, request.to)
        })?;

        validate_tolerance(request.slippage_tolerance).inspect_err(|_| {
            warn!(tolerance = %request.slippage_tolerance, "Swap rejected: tolerance out of range");
        })?;

        let beneficiary = signer.signer_address().await?;

        let quote = match direction {
            SwapDirection::In => {
                self.reader
                    .quote_out(
                        &request.amm,
                        &path.side_index_path,
                        &path.pool_path,
                        &request.amount,
                    )
                    .await?
            }
            SwapDirection::Out => {
                self.reader
                    .quote_in(
                        &request.amm,
                        &path.side_index_path,
                        &path.pool_path,
                        &request.amount,
                    )
                    .await?
            }
        };
        let bound = protected_bound(direction, &quote, request.slippage_tolerance);
        debug!(
            %direction,
            side_index_path = ?path.side_index_path,
            pool_path = ?path.pool_path,
            %quote,
            %bound,
            "Swap quoted"
        );

        // Exact-in spends the fixed amount, exact-out at most the bound
        let (amount_in, amount_out) = match direction {
            SwapDirection::In => (request.amount.clone(), bound),
            SwapDirection::Out => (bound, request.amount.clone()),
        };

        if options.auto_approve {
            ApprovalGate::new(self.reader, &**signer)
                .ensure_token_allowance(
                    &request.amm,
                    request.from,
                    &beneficiary,
                    self.router,
                    &amount_in,
                )
                .await?;
        }

        let call = SwapCall {
            amm: request.amm.clone(),
            side_index_path: path.side_index_path,
            pool_path: path.pool_path,
            amount_in,
            amount_out,
            beneficiary,
            deadline: request
                .deadline
                .unwrap_or_else(|| Deadline::after(Duration::from_secs(DEFAULT_DEADLINE_SECS))),
        };

        let tx = match direction {
            SwapDirection::In => signer.swap_exact_in(&call).await?,
            SwapDirection::Out => signer.swap_exact_out(&call).await?,
        };
        info!(
            %direction,
            from = %request.from,
            to = %request.to,
            amount_in = %call.amount_in,
            amount_out = %call.amount_out,
            tx = %tx,
            "Swap submitted"
        );
        Ok(tx)
    }
}
