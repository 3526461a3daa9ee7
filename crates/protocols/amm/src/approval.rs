//! Approval Gate
//!
//! Makes sure a spender may move the caller's tokens before the call that
//! spends them goes out. Approvals are submitted for exactly the amount
//! needed and awaited, so the dependent call never races its approval.

use apwine_core::{Address, Amount, TokenKind};
use ledger_client::{
    AllowanceReader, ChainReader, Signer, TokenDirectory, TransactionHandle, TransactionSubmitter,
};
use tracing::{debug, info};

use crate::state::SwapError;

/// Allowance and operator-approval checks bound to one signer
pub struct ApprovalGate<'a> {
    reader: &'a dyn ChainReader,
    signer: &'a dyn Signer,
}

impl<'a> ApprovalGate<'a> {
    pub fn new(reader: &'a dyn ChainReader, signer: &'a dyn Signer) -> Self {
        Self { reader, signer }
    }

    /// Whether `owner` already allows `spender` to move `amount` of `token`
    pub async fn has_allowance(
        &self,
        owner: &Address,
        spender: &Address,
        token: &Address,
        amount: &Amount,
    ) -> Result<bool, SwapError> {
        let allowance = self.reader.allowance(owner, spender, token).await?;
        debug!(%owner, %spender, %token, %allowance, required = %amount, "Allowance read");
        Ok(&allowance >= amount)
    }

    /// Approve `spender` for exactly `amount` unless the current allowance
    /// already covers it. Returns the approval transaction when one was sent.
    pub async fn ensure_allowance(
        &self,
        owner: &Address,
        spender: &Address,
        token: &Address,
        amount: &Amount,
    ) -> Result<Option<TransactionHandle>, SwapError> {
        if self.has_allowance(owner, spender, token, amount).await? {
            return Ok(None);
        }

        let tx = self.signer.approve(token, spender, amount).await?;
        info!(%token, %spender, %amount, tx = %tx, "Approval submitted");
        self.signer.wait_for_acceptance(&tx).await?;
        Ok(Some(tx))
    }

    /// [`Self::ensure_allowance`] for a token kind of `amm`
    pub async fn ensure_token_allowance(
        &self,
        amm: &Address,
        kind: TokenKind,
        owner: &Address,
        spender: &Address,
        amount: &Amount,
    ) -> Result<Option<TransactionHandle>, SwapError> {
        let token = resolve_token(self.reader, amm, kind).await?;
        self.ensure_allowance(owner, spender, &token, amount).await
    }

    pub async fn has_operator_approval(
        &self,
        owner: &Address,
        operator: &Address,
        collection: &Address,
    ) -> Result<bool, SwapError> {
        Ok(self
            .reader
            .is_approved_for_all(owner, operator, collection)
            .await?)
    }

    /// Grant `operator` control of the whole `collection` unless it already has it
    pub async fn ensure_operator_approval(
        &self,
        owner: &Address,
        operator: &Address,
        collection: &Address,
    ) -> Result<Option<TransactionHandle>, SwapError> {
        if self.has_operator_approval(owner, operator, collection).await? {
            return Ok(None);
        }

        let tx = self
            .signer
            .set_approval_for_all(collection, operator, true)
            .await?;
        info!(%collection, %operator, tx = %tx, "Operator approval submitted");
        self.signer.wait_for_acceptance(&tx).await?;
        Ok(Some(tx))
    }

    /// Set or revoke the AMM's operator approval over its LP collection,
    /// regardless of the current state
    pub async fn approve_lp_for_all(
        &self,
        amm: &Address,
        approved: bool,
    ) -> Result<TransactionHandle, SwapError> {
        let collection = self.reader.pool_token_address(amm).await?;
        let tx = self
            .signer
            .set_approval_for_all(&collection, amm, approved)
            .await?;
        info!(%amm, approved, tx = %tx, "LP operator approval set");
        Ok(tx)
    }
}

/// Token contract behind `kind` on `amm`
pub async fn resolve_token(
    reader: &dyn ChainReader,
    amm: &Address,
    kind: TokenKind,
) -> Result<Address, SwapError> {
    reader
        .token_address(amm, kind)
        .await?
        .ok_or_else(|| SwapError::NoSuchToken {
            token: kind.to_string(),
        })
}
