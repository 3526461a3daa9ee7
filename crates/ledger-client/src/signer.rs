//! Signing identity and transaction submission

use std::fmt;
use std::sync::Arc;

use apwine_core::{Address, Amount, Deadline, PoolId, TxHash};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHandle {
    pub hash: TxHash,
}

impl TransactionHandle {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: TxHash::new(hash),
        }
    }
}

impl fmt::Display for TransactionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hash)
    }
}

/// Positional arguments of a router swap.
///
/// For an exact-in swap `amount_in` is exact and `amount_out` is the minimum
/// accepted; for an exact-out swap `amount_out` is exact and `amount_in` is
/// the maximum spent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapCall {
    pub amm: Address,
    pub side_index_path: Vec<u8>,
    pub pool_path: Vec<PoolId>,
    pub amount_in: Amount,
    pub amount_out: Amount,
    pub beneficiary: Address,
    pub deadline: Deadline,
}

#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Address the signer signs for
    async fn signer_address(&self) -> Result<Address>;
}

/// Mutating calls. Each call is submitted once; retries are the
/// implementation's business.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// ERC-20 `approve(spender, amount)` on `token`
    async fn approve(
        &self,
        token: &Address,
        spender: &Address,
        amount: &Amount,
    ) -> Result<TransactionHandle>;

    /// ERC-1155 `setApprovalForAll(operator, approved)` on `collection`
    async fn set_approval_for_all(
        &self,
        collection: &Address,
        operator: &Address,
        approved: bool,
    ) -> Result<TransactionHandle>;

    async fn swap_exact_in(&self, call: &SwapCall) -> Result<TransactionHandle>;

    async fn swap_exact_out(&self, call: &SwapCall) -> Result<TransactionHandle>;

    async fn add_liquidity(
        &self,
        amm: &Address,
        pool: PoolId,
        amount: &Amount,
        max_amounts_in: &[Amount; 2],
    ) -> Result<TransactionHandle>;

    async fn remove_liquidity(
        &self,
        amm: &Address,
        pool: PoolId,
        amount: &Amount,
        min_amounts_out: &[Amount; 2],
        account: &Address,
    ) -> Result<TransactionHandle>;

    async fn deposit(
        &self,
        controller: &Address,
        vault: &Address,
        amount: &Amount,
    ) -> Result<TransactionHandle>;

    async fn withdraw(
        &self,
        controller: &Address,
        vault: &Address,
        amount: &Amount,
    ) -> Result<TransactionHandle>;

    /// Resolve once the transaction has been accepted by the ledger
    async fn wait_for_acceptance(&self, tx: &TransactionHandle) -> Result<()>;
}

/// A signing identity that can submit transactions
pub trait Signer: IdentityResolver + TransactionSubmitter {}

impl<T> Signer for T where T: IdentityResolver + TransactionSubmitter {}

/// Signer slot of a request: either an identity is bound or it is not.
#[derive(Clone, Default)]
pub enum SignerBinding {
    Bound(Arc<dyn Signer>),
    #[default]
    Unbound,
}

impl SignerBinding {
    pub fn bound(signer: Arc<dyn Signer>) -> Self {
        Self::Bound(signer)
    }

    pub fn signer(&self) -> Option<&Arc<dyn Signer>> {
        match self {
            Self::Bound(signer) => Some(signer),
            Self::Unbound => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }
}

impl fmt::Debug for SignerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bound(_) => f.write_str("Bound(..)"),
            Self::Unbound => f.write_str("Unbound"),
        }
    }
}
