//! In-memory ledger for tests
//!
//! Records every call in order so tests can assert on call sequences, and
//! keeps just enough state (allowances, operator approvals) for approvals
//! to be observable by later reads.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use apwine_core::{Address, Amount, PoolId, TokenKind, TransportError, TxHash};
use async_trait::async_trait;

use crate::reader::{AllowanceReader, QuoteProvider, TokenDirectory, VaultReader};
use crate::signer::{IdentityResolver, SwapCall, TransactionHandle, TransactionSubmitter};
use crate::Result;

/// Deterministic test address: `0x` followed by `byte` repeated 20 times
pub fn addr(byte: u8) -> Address {
    let hex: String = std::iter::repeat(format!("{:02x}", byte)).take(20).collect();
    Address::parse(&format!("0x{}", hex)).expect("repeated byte is valid hex")
}

/// One recorded ledger interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    SignerAddress,
    QuoteOut {
        side_index_path: Vec<u8>,
        pool_path: Vec<PoolId>,
        amount_in: Amount,
    },
    QuoteIn {
        side_index_path: Vec<u8>,
        pool_path: Vec<PoolId>,
        amount_out: Amount,
    },
    Allowance {
        owner: Address,
        spender: Address,
        token: Address,
    },
    IsApprovedForAll {
        owner: Address,
        operator: Address,
        collection: Address,
    },
    TokenAddress(TokenKind),
    PoolTokenAddress,
    CurrentPeriodIndex,
    AmmId,
    LpTokenId {
        period_index: u64,
        pool: PoolId,
    },
    VaultRead(&'static str),
    Approve {
        token: Address,
        spender: Address,
        amount: Amount,
    },
    SetApprovalForAll {
        collection: Address,
        operator: Address,
        approved: bool,
    },
    SwapExactIn(SwapCall),
    SwapExactOut(SwapCall),
    AddLiquidity {
        pool: PoolId,
        amount: Amount,
        max_amounts_in: [Amount; 2],
    },
    RemoveLiquidity {
        pool: PoolId,
        amount: Amount,
        min_amounts_out: [Amount; 2],
        account: Address,
    },
    Deposit {
        controller: Address,
        vault: Address,
        amount: Amount,
    },
    Withdraw {
        controller: Address,
        vault: Address,
        amount: Amount,
    },
    WaitForAcceptance(TxHash),
}

impl LedgerCall {
    /// Whether this call submits a transaction
    pub fn is_submission(&self) -> bool {
        matches!(
            self,
            Self::Approve { .. }
                | Self::SetApprovalForAll { .. }
                | Self::SwapExactIn(_)
                | Self::SwapExactOut(_)
                | Self::AddLiquidity { .. }
                | Self::RemoveLiquidity { .. }
                | Self::Deposit { .. }
                | Self::Withdraw { .. }
        )
    }
}

/// Canned future vault
#[derive(Debug, Clone)]
pub struct MockVault {
    pub address: Address,
    pub ibt: Address,
    pub pt: Address,
    pub fyt: Address,
    pub period_duration: u64,
    pub platform: String,
    pub next_period_index: u64,
    pub deposits_paused: bool,
    pub withdrawals_paused: bool,
}

#[derive(Debug)]
struct MockState {
    calls: Vec<LedgerCall>,
    signer: Address,
    quote: Amount,
    tokens: HashMap<TokenKind, Address>,
    lp_collection: Address,
    controller: Address,
    allowances: HashMap<(Address, Address, Address), Amount>,
    operators: HashSet<(Address, Address, Address)>,
    period_index: u64,
    amm_id: u64,
    vaults: Vec<MockVault>,
    next_period_start: u64,
    submit_error: Option<TransportError>,
    tx_counter: u64,
}

/// Recording in-memory implementation of every ledger trait
#[derive(Debug)]
pub struct MockLedger {
    state: Mutex<MockState>,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLedger {
    pub fn new() -> Self {
        let tokens = HashMap::from([
            (TokenKind::Pt, Self::token(TokenKind::Pt)),
            (TokenKind::Underlying, Self::token(TokenKind::Underlying)),
            (TokenKind::Fyt, Self::token(TokenKind::Fyt)),
        ]);
        Self {
            state: Mutex::new(MockState {
                calls: Vec::new(),
                signer: Self::default_signer_address(),
                quote: Amount::from(0u32),
                tokens,
                lp_collection: Self::lp_collection(),
                controller: Self::controller(),
                allowances: HashMap::new(),
                operators: HashSet::new(),
                period_index: 0,
                amm_id: 0,
                vaults: Vec::new(),
                next_period_start: 0,
                submit_error: None,
                tx_counter: 0,
            }),
        }
    }

    pub fn default_signer_address() -> Address {
        addr(0xee)
    }

    /// Token contract the mock reports for `kind`
    pub fn token(kind: TokenKind) -> Address {
        addr(0x01 + kind.index() as u8)
    }

    pub fn lp_collection() -> Address {
        addr(0x0c)
    }

    pub fn controller() -> Address {
        addr(0xc0)
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn state_mut(&mut self) -> &mut MockState {
        self.state.get_mut().unwrap_or_else(|e| e.into_inner())
    }

    /// Value returned by both `quote_out` and `quote_in`
    pub fn with_quote(mut self, quote: impl Into<Amount>) -> Self {
        self.state_mut().quote = quote.into();
        self
    }

    pub fn with_signer_address(mut self, address: Address) -> Self {
        self.state_mut().signer = address;
        self
    }

    pub fn with_allowance(
        mut self,
        owner: &Address,
        spender: &Address,
        token: &Address,
        amount: impl Into<Amount>,
    ) -> Self {
        self.state_mut()
            .allowances
            .insert((owner.clone(), spender.clone(), token.clone()), amount.into());
        self
    }

    pub fn with_operator_approval(
        mut self,
        owner: &Address,
        operator: &Address,
        collection: &Address,
    ) -> Self {
        self.state_mut()
            .operators
            .insert((owner.clone(), operator.clone(), collection.clone()));
        self
    }

    /// Make `token_address(kind)` return `None`
    pub fn without_token(mut self, kind: TokenKind) -> Self {
        self.state_mut().tokens.remove(&kind);
        self
    }

    pub fn with_period_index(mut self, period_index: u64) -> Self {
        self.state_mut().period_index = period_index;
        self
    }

    pub fn with_amm_id(mut self, amm_id: u64) -> Self {
        self.state_mut().amm_id = amm_id;
        self
    }

    pub fn with_vault(mut self, vault: MockVault) -> Self {
        self.state_mut().vaults.push(vault);
        self
    }

    pub fn with_next_period_start(mut self, timestamp: u64) -> Self {
        self.state_mut().next_period_start = timestamp;
        self
    }

    /// Fail every submission with `error`
    pub fn failing_submissions(mut self, error: TransportError) -> Self {
        self.state_mut().submit_error = Some(error);
        self
    }

    /// Every call recorded so far, in order
    pub fn calls(&self) -> Vec<LedgerCall> {
        self.lock().calls.clone()
    }

    pub fn submissions(&self) -> Vec<LedgerCall> {
        self.calls().into_iter().filter(|c| c.is_submission()).collect()
    }

    pub fn approvals(&self) -> Vec<LedgerCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, LedgerCall::Approve { .. }))
            .collect()
    }

    fn record(&self, call: LedgerCall) {
        self.lock().calls.push(call);
    }

    fn submit(&self, call: LedgerCall) -> Result<TransactionHandle> {
        let mut state = self.lock();
        state.calls.push(call);
        if let Some(err) = state.submit_error.clone() {
            return Err(err);
        }
        state.tx_counter += 1;
        Ok(TransactionHandle::new(format!("0x{:064x}", state.tx_counter)))
    }

    fn vault(&self, address: &Address) -> Result<MockVault> {
        self.lock()
            .vaults
            .iter()
            .find(|v| &v.address == address)
            .cloned()
            .ok_or_else(|| TransportError::Rpc {
                message: format!("execution reverted: no vault at {}", address),
            })
    }
}

#[async_trait]
impl QuoteProvider for MockLedger {
    async fn quote_out(
        &self,
        _amm: &Address,
        side_index_path: &[u8],
        pool_path: &[PoolId],
        amount_in: &Amount,
    ) -> Result<Amount> {
        self.record(LedgerCall::QuoteOut {
            side_index_path: side_index_path.to_vec(),
            pool_path: pool_path.to_vec(),
            amount_in: amount_in.clone(),
        });
        Ok(self.lock().quote.clone())
    }

    async fn quote_in(
        &self,
        _amm: &Address,
        side_index_path: &[u8],
        pool_path: &[PoolId],
        amount_out: &Amount,
    ) -> Result<Amount> {
        self.record(LedgerCall::QuoteIn {
            side_index_path: side_index_path.to_vec(),
            pool_path: pool_path.to_vec(),
            amount_out: amount_out.clone(),
        });
        Ok(self.lock().quote.clone())
    }
}

#[async_trait]
impl AllowanceReader for MockLedger {
    async fn allowance(
        &self,
        owner: &Address,
        spender: &Address,
        token: &Address,
    ) -> Result<Amount> {
        let mut state = self.lock();
        state.calls.push(LedgerCall::Allowance {
            owner: owner.clone(),
            spender: spender.clone(),
            token: token.clone(),
        });
        Ok(state
            .allowances
            .get(&(owner.clone(), spender.clone(), token.clone()))
            .cloned()
            .unwrap_or_default())
    }

    async fn is_approved_for_all(
        &self,
        owner: &Address,
        operator: &Address,
        collection: &Address,
    ) -> Result<bool> {
        let mut state = self.lock();
        state.calls.push(LedgerCall::IsApprovedForAll {
            owner: owner.clone(),
            operator: operator.clone(),
            collection: collection.clone(),
        });
        Ok(state
            .operators
            .contains(&(owner.clone(), operator.clone(), collection.clone())))
    }
}

#[async_trait]
impl TokenDirectory for MockLedger {
    async fn token_address(&self, _amm: &Address, kind: TokenKind) -> Result<Option<Address>> {
        let mut state = self.lock();
        state.calls.push(LedgerCall::TokenAddress(kind));
        Ok(state.tokens.get(&kind).cloned())
    }

    async fn pool_token_address(&self, _amm: &Address) -> Result<Address> {
        let mut state = self.lock();
        state.calls.push(LedgerCall::PoolTokenAddress);
        Ok(state.lp_collection.clone())
    }

    async fn current_period_index(&self, _amm: &Address) -> Result<u64> {
        let mut state = self.lock();
        state.calls.push(LedgerCall::CurrentPeriodIndex);
        Ok(state.period_index)
    }

    async fn amm_id(&self, _amm: &Address) -> Result<u64> {
        let mut state = self.lock();
        state.calls.push(LedgerCall::AmmId);
        Ok(state.amm_id)
    }

    async fn lp_token_id(
        &self,
        _amm: &Address,
        amm_id: u64,
        period_index: u64,
        pool: PoolId,
    ) -> Result<Amount> {
        self.record(LedgerCall::LpTokenId { period_index, pool });
        // amm id, period and pool packed into one id, as the contract does
        Ok(Amount::from(amm_id) << 128u32
            | Amount::from(period_index) << 64u32
            | Amount::from(pool.as_u8()))
    }
}

#[async_trait]
impl VaultReader for MockLedger {
    async fn future_vault_count(&self, _registry: &Address) -> Result<u64> {
        self.record(LedgerCall::VaultRead("future_vault_count"));
        Ok(self.lock().vaults.len() as u64)
    }

    async fn future_vault_at(&self, _registry: &Address, index: u64) -> Result<Address> {
        self.record(LedgerCall::VaultRead("future_vault_at"));
        self.lock()
            .vaults
            .get(index as usize)
            .map(|v| v.address.clone())
            .ok_or_else(|| TransportError::Rpc {
                message: format!("execution reverted: index {} out of bounds", index),
            })
    }

    async fn controller_address(&self, _registry: &Address) -> Result<Address> {
        self.record(LedgerCall::VaultRead("controller_address"));
        Ok(self.lock().controller.clone())
    }

    async fn ibt_address(&self, vault: &Address) -> Result<Address> {
        self.record(LedgerCall::VaultRead("ibt_address"));
        Ok(self.vault(vault)?.ibt)
    }

    async fn pt_address(&self, vault: &Address) -> Result<Address> {
        self.record(LedgerCall::VaultRead("pt_address"));
        Ok(self.vault(vault)?.pt)
    }

    async fn fyt_address(&self, vault: &Address) -> Result<Address> {
        self.record(LedgerCall::VaultRead("fyt_address"));
        Ok(self.vault(vault)?.fyt)
    }

    async fn period_duration(&self, vault: &Address) -> Result<u64> {
        self.record(LedgerCall::VaultRead("period_duration"));
        Ok(self.vault(vault)?.period_duration)
    }

    async fn platform_name(&self, vault: &Address) -> Result<String> {
        self.record(LedgerCall::VaultRead("platform_name"));
        Ok(self.vault(vault)?.platform)
    }

    async fn next_period_index(&self, vault: &Address) -> Result<u64> {
        self.record(LedgerCall::VaultRead("next_period_index"));
        Ok(self.vault(vault)?.next_period_index)
    }

    async fn deposits_paused(&self, _controller: &Address, vault: &Address) -> Result<bool> {
        self.record(LedgerCall::VaultRead("deposits_paused"));
        Ok(self.vault(vault)?.deposits_paused)
    }

    async fn withdrawals_paused(&self, _controller: &Address, vault: &Address) -> Result<bool> {
        self.record(LedgerCall::VaultRead("withdrawals_paused"));
        Ok(self.vault(vault)?.withdrawals_paused)
    }

    async fn next_period_start(&self, _controller: &Address, _period_duration: u64) -> Result<u64> {
        self.record(LedgerCall::VaultRead("next_period_start"));
        Ok(self.lock().next_period_start)
    }
}

#[async_trait]
impl IdentityResolver for MockLedger {
    async fn signer_address(&self) -> Result<Address> {
        let mut state = self.lock();
        state.calls.push(LedgerCall::SignerAddress);
        Ok(state.signer.clone())
    }
}

#[async_trait]
impl TransactionSubmitter for MockLedger {
    async fn approve(
        &self,
        token: &Address,
        spender: &Address,
        amount: &Amount,
    ) -> Result<TransactionHandle> {
        let handle = self.submit(LedgerCall::Approve {
            token: token.clone(),
            spender: spender.clone(),
            amount: amount.clone(),
        })?;
        let mut state = self.lock();
        let owner = state.signer.clone();
        state
            .allowances
            .insert((owner, spender.clone(), token.clone()), amount.clone());
        Ok(handle)
    }

    async fn set_approval_for_all(
        &self,
        collection: &Address,
        operator: &Address,
        approved: bool,
    ) -> Result<TransactionHandle> {
        let handle = self.submit(LedgerCall::SetApprovalForAll {
            collection: collection.clone(),
            operator: operator.clone(),
            approved,
        })?;
        let mut state = self.lock();
        let key = (state.signer.clone(), operator.clone(), collection.clone());
        if approved {
            state.operators.insert(key);
        } else {
            state.operators.remove(&key);
        }
        Ok(handle)
    }

    async fn swap_exact_in(&self, call: &SwapCall) -> Result<TransactionHandle> {
        self.submit(LedgerCall::SwapExactIn(call.clone()))
    }

    async fn swap_exact_out(&self, call: &SwapCall) -> Result<TransactionHandle> {
        self.submit(LedgerCall::SwapExactOut(call.clone()))
    }

    async fn add_liquidity(
        &self,
        _amm: &Address,
        pool: PoolId,
        amount: &Amount,
        max_amounts_in: &[Amount; 2],
    ) -> Result<TransactionHandle> {
        self.submit(LedgerCall::AddLiquidity {
            pool,
            amount: amount.clone(),
            max_amounts_in: max_amounts_in.clone(),
        })
    }

    async fn remove_liquidity(
        &self,
        _amm: &Address,
        pool: PoolId,
        amount: &Amount,
        min_amounts_out: &[Amount; 2],
        account: &Address,
    ) -> Result<TransactionHandle> {
        self.submit(LedgerCall::RemoveLiquidity {
            pool,
            amount: amount.clone(),
            min_amounts_out: min_amounts_out.clone(),
            account: account.clone(),
        })
    }

    async fn deposit(
        &self,
        controller: &Address,
        vault: &Address,
        amount: &Amount,
    ) -> Result<TransactionHandle> {
        self.submit(LedgerCall::Deposit {
            controller: controller.clone(),
            vault: vault.clone(),
            amount: amount.clone(),
        })
    }

    async fn withdraw(
        &self,
        controller: &Address,
        vault: &Address,
        amount: &Amount,
    ) -> Result<TransactionHandle> {
        self.submit(LedgerCall::Withdraw {
            controller: controller.clone(),
            vault: vault.clone(),
            amount: amount.clone(),
        })
    }

    async fn wait_for_acceptance(&self, tx: &TransactionHandle) -> Result<()> {
        self.record(LedgerCall::WaitForAcceptance(tx.hash.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addr_is_valid() {
        assert_eq!(addr(0xab).as_str(), format!("0x{}", "ab".repeat(20)));
    }

    #[tokio::test]
    async fn test_approve_updates_allowance() {
        let ledger = MockLedger::new();
        let owner = MockLedger::default_signer_address();
        let spender = addr(0x99);
        let token = MockLedger::token(TokenKind::Pt);

        ledger
            .approve(&token, &spender, &Amount::from(500u32))
            .await
            .unwrap();
        let allowance = ledger.allowance(&owner, &spender, &token).await.unwrap();
        assert_eq!(allowance, Amount::from(500u32));
        assert_eq!(ledger.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_failing_submissions() {
        let ledger = MockLedger::new().failing_submissions(TransportError::Rpc {
            message: "boom".into(),
        });
        let err = ledger
            .approve(&addr(1), &addr(2), &Amount::from(1u32))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            TransportError::Rpc {
                message: "boom".into()
            }
        );
    }

    #[tokio::test]
    async fn test_missing_token() {
        let ledger = MockLedger::new().without_token(TokenKind::Fyt);
        assert!(ledger
            .token_address(&addr(0x0a), TokenKind::Fyt)
            .await
            .unwrap()
            .is_none());
    }
}
