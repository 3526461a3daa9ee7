//! Vault Deposits and Withdrawals
//!
//! Both go through the controller the registry points at.

use apwine_core::{Address, Amount};
use ledger_client::{ChainReader, SignerBinding, TransactionHandle, TransactionSubmitter, VaultReader};
use tracing::{info, warn};

use crate::state::VaultError;

/// Deposit `amount` of the vault's IBT
pub async fn deposit(
    reader: &dyn ChainReader,
    registry: &Address,
    signer: &SignerBinding,
    vault: &Address,
    amount: &Amount,
) -> Result<TransactionHandle, VaultError> {
    let signer = signer.signer().ok_or_else(|| {
        warn!(%vault, "Deposit rejected: no signer");
        VaultError::NoSigner
    })?;
    let controller = reader.controller_address(registry).await?;

    let tx = signer.deposit(&controller, vault, amount).await?;
    info!(%vault, %amount, tx = %tx, "Deposit submitted");
    Ok(tx)
}

/// Withdraw `amount` from the vault
pub async fn withdraw(
    reader: &dyn ChainReader,
    registry: &Address,
    signer: &SignerBinding,
    vault: &Address,
    amount: &Amount,
) -> Result<TransactionHandle, VaultError> {
    let signer = signer.signer().ok_or_else(|| {
        warn!(%vault, "Withdrawal rejected: no signer");
        VaultError::NoSigner
    })?;
    let controller = reader.controller_address(registry).await?;

    let tx = signer.withdraw(&controller, vault, amount).await?;
    info!(%vault, %amount, tx = %tx, "Withdrawal submitted");
    Ok(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use apwine_core::TransportError;
    use ledger_client::mock::{addr, LedgerCall, MockLedger};

    #[tokio::test]
    async fn test_deposit_through_controller() {
        let ledger = Arc::new(MockLedger::new());
        let signer = SignerBinding::bound(ledger.clone());

        deposit(
            &*ledger,
            &addr(0xf0),
            &signer,
            &addr(0x10),
            &Amount::from(5u32),
        )
        .await
        .unwrap();

        assert_eq!(
            ledger.submissions(),
            vec![LedgerCall::Deposit {
                controller: MockLedger::controller(),
                vault: addr(0x10),
                amount: Amount::from(5u32),
            }]
        );
    }

    #[tokio::test]
    async fn test_withdraw_calls_withdraw() {
        let ledger = Arc::new(MockLedger::new());
        let signer = SignerBinding::bound(ledger.clone());

        withdraw(
            &*ledger,
            &addr(0xf0),
            &signer,
            &addr(0x10),
            &Amount::from(5u32),
        )
        .await
        .unwrap();

        assert_eq!(
            ledger.submissions(),
            vec![LedgerCall::Withdraw {
                controller: MockLedger::controller(),
                vault: addr(0x10),
                amount: Amount::from(5u32),
            }]
        );
    }

    #[tokio::test]
    async fn test_no_signer() {
        let ledger = MockLedger::new();
        let unbound = SignerBinding::Unbound;

        for result in [
            deposit(&ledger, &addr(0xf0), &unbound, &addr(0x10), &Amount::from(1u32)).await,
            withdraw(&ledger, &addr(0xf0), &unbound, &addr(0x10), &Amount::from(1u32)).await,
        ] {
            assert_eq!(result, Err(VaultError::NoSigner));
        }
        assert!(ledger.calls().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let failure = TransportError::Unreachable {
            url: "http://127.0.0.1:8545".into(),
        };
        let ledger = Arc::new(MockLedger::new().failing_submissions(failure.clone()));
        let signer = SignerBinding::bound(ledger.clone());

        let err = deposit(
            &*ledger,
            &addr(0xf0),
            &signer,
            &addr(0x10),
            &Amount::from(1u32),
        )
        .await
        .unwrap_err();
        assert_eq!(err, VaultError::Transport(failure));
        assert_eq!(err.error_code(), "Transport");
    }
}
