//! Future Vault Discovery
//!
//! Vaults are listed by the registry. Per-vault fields live partly on the
//! vault and partly on the controller, so one aggregate needs both.

use apwine_core::Address;
use futures::future::try_join_all;
use ledger_client::{ChainReader, VaultReader};
use tracing::debug;

use crate::state::{FutureAggregate, VaultError};

/// Aggregate of the vault at `address`
pub async fn fetch_future_from_address(
    reader: &dyn ChainReader,
    registry: &Address,
    address: &Address,
) -> Result<FutureAggregate, VaultError> {
    let controller = reader.controller_address(registry).await?;
    let (
        ibt_address,
        pt_address,
        period_duration,
        platform,
        deposits_paused,
        withdrawals_paused,
        next_period_index,
    ) = tokio::try_join!(
        reader.ibt_address(address),
        reader.pt_address(address),
        reader.period_duration(address),
        reader.platform_name(address),
        reader.deposits_paused(&controller, address),
        reader.withdrawals_paused(&controller, address),
        reader.next_period_index(address),
    )?;

    // Needs the period length first
    let next_period_timestamp = reader
        .next_period_start(&controller, period_duration)
        .await?;

    debug!(vault = %address, %platform, next_period_index, "Future vault fetched");
    Ok(FutureAggregate {
        address: address.clone(),
        ibt_address,
        pt_address,
        period_duration,
        platform,
        deposits_paused,
        withdrawals_paused,
        next_period_index,
        next_period_timestamp,
    })
}

/// Aggregate of the `index`-th vault in the registry
pub async fn fetch_future_from_index(
    reader: &dyn ChainReader,
    registry: &Address,
    index: u64,
) -> Result<FutureAggregate, VaultError> {
    let address = reader.future_vault_at(registry, index).await?;
    fetch_future_from_address(reader, registry, &address).await
}

/// Addresses of every registered vault, in registry order
pub async fn fetch_all_future_vaults(
    reader: &dyn ChainReader,
    registry: &Address,
) -> Result<Vec<Address>, VaultError> {
    let count = reader.future_vault_count(registry).await?;
    let vaults = try_join_all((0..count).map(|index| reader.future_vault_at(registry, index))).await?;
    debug!(count, "Future vaults listed");
    Ok(vaults)
}

pub async fn fetch_all_future_aggregates(
    reader: &dyn ChainReader,
    registry: &Address,
) -> Result<Vec<FutureAggregate>, VaultError> {
    let vaults = fetch_all_future_vaults(reader, registry).await?;
    try_join_all(
        vaults
            .iter()
            .map(|vault| fetch_future_from_address(reader, registry, vault)),
    )
    .await
}

/// PT contract of every registered vault
pub async fn fetch_pt_tokens(
    reader: &dyn ChainReader,
    registry: &Address,
) -> Result<Vec<Address>, VaultError> {
    let vaults = fetch_all_future_vaults(reader, registry).await?;
    Ok(try_join_all(vaults.iter().map(|vault| reader.pt_address(vault))).await?)
}

/// Current-period FYT contract of every registered vault
pub async fn fetch_fyt_tokens(
    reader: &dyn ChainReader,
    registry: &Address,
) -> Result<Vec<Address>, VaultError> {
    let vaults = fetch_all_future_vaults(reader, registry).await?;
    Ok(try_join_all(vaults.iter().map(|vault| reader.fyt_address(vault))).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apwine_core::TransportError;
    use ledger_client::mock::{addr, MockLedger, MockVault};

    fn vault(byte: u8, platform: &str) -> MockVault {
        MockVault {
            address: addr(byte),
            ibt: addr(byte + 1),
            pt: addr(byte + 2),
            fyt: addr(byte + 3),
            period_duration: 2_592_000,
            platform: platform.to_string(),
            next_period_index: 7,
            deposits_paused: false,
            withdrawals_paused: true,
        }
    }

    fn registry() -> Address {
        addr(0xf0)
    }

    #[tokio::test]
    async fn test_fetch_from_address() {
        let ledger = MockLedger::new()
            .with_vault(vault(0x10, "Aave"))
            .with_next_period_start(1_650_000_000);

        let future = fetch_future_from_address(&ledger, &registry(), &addr(0x10))
            .await
            .unwrap();

        assert_eq!(
            future,
            FutureAggregate {
                address: addr(0x10),
                ibt_address: addr(0x11),
                pt_address: addr(0x12),
                period_duration: 2_592_000,
                platform: "Aave".into(),
                deposits_paused: false,
                withdrawals_paused: true,
                next_period_index: 7,
                next_period_timestamp: 1_650_000_000,
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_from_index() {
        let ledger = MockLedger::new()
            .with_vault(vault(0x10, "Aave"))
            .with_vault(vault(0x20, "Yearn"));

        let future = fetch_future_from_index(&ledger, &registry(), 1).await.unwrap();
        assert_eq!(future.address, addr(0x20));
        assert_eq!(future.platform, "Yearn");

        let err = fetch_future_from_index(&ledger, &registry(), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::Transport(TransportError::Rpc { .. })));
    }

    #[tokio::test]
    async fn test_fetch_all() {
        let ledger = MockLedger::new()
            .with_vault(vault(0x10, "Aave"))
            .with_vault(vault(0x20, "Yearn"))
            .with_vault(vault(0x30, "Harvest"));

        let vaults = fetch_all_future_vaults(&ledger, &registry()).await.unwrap();
        assert_eq!(vaults, vec![addr(0x10), addr(0x20), addr(0x30)]);

        let aggregates = fetch_all_future_aggregates(&ledger, &registry())
            .await
            .unwrap();
        let platforms: Vec<_> = aggregates.iter().map(|a| a.platform.as_str()).collect();
        assert_eq!(platforms, vec!["Aave", "Yearn", "Harvest"]);

        let pts = fetch_pt_tokens(&ledger, &registry()).await.unwrap();
        assert_eq!(pts, vec![addr(0x12), addr(0x22), addr(0x32)]);
    }

    #[tokio::test]
    async fn test_fetch_fyt_tokens() {
        let ledger = MockLedger::new()
            .with_vault(vault(0x10, "Aave"))
            .with_vault(vault(0x20, "Yearn"));

        let fyts = fetch_fyt_tokens(&ledger, &registry()).await.unwrap();
        assert_eq!(fyts, vec![addr(0x13), addr(0x23)]);
        assert!(fetch_fyt_tokens(&MockLedger::new(), &registry())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_empty_registry() {
        let ledger = MockLedger::new();
        assert!(fetch_all_future_aggregates(&ledger, &registry())
            .await
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_aggregate_serializes() {
        let json = serde_json::to_value(FutureAggregate {
            address: addr(0x10),
            ibt_address: addr(0x11),
            pt_address: addr(0x12),
            period_duration: 60,
            platform: "Aave".into(),
            deposits_paused: true,
            withdrawals_paused: false,
            next_period_index: 1,
            next_period_timestamp: 2,
        })
        .unwrap();
        assert_eq!(json["platform"], "Aave");
        assert_eq!(json["pt_address"], addr(0x12).as_str());
    }
}
