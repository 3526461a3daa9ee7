//! LP Token Pool Discovery
//!
//! LP positions are ERC-1155 tokens of a single collection per AMM, one id
//! per (period, pool).

use apwine_core::{Address, Amount, PoolId};
use futures::future::try_join_all;
use ledger_client::{AllowanceReader, ChainReader, Result, TokenDirectory};
use tracing::debug;

/// One LP token id of an AMM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LpTokenPool {
    /// ERC-1155 collection holding every LP token of the AMM
    pub collection: Address,
    pub token_id: Amount,
    pub pool: PoolId,
    pub period_index: u64,
}

/// LP token of `pool` for `period_index`, or for the current period when
/// none is given
pub async fn fetch_lp_token_pool(
    reader: &dyn ChainReader,
    amm: &Address,
    pool: PoolId,
    period_index: Option<u64>,
) -> Result<LpTokenPool> {
    let period_index = match period_index {
        Some(index) => index,
        None => reader.current_period_index(amm).await?,
    };
    let (collection, amm_id) =
        tokio::try_join!(reader.pool_token_address(amm), reader.amm_id(amm))?;
    let token_id = reader.lp_token_id(amm, amm_id, period_index, pool).await?;

    Ok(LpTokenPool {
        collection,
        token_id,
        pool,
        period_index,
    })
}

/// LP tokens of both pools for every completed period, pool-major order
pub async fn fetch_all_lp_token_pools(
    reader: &dyn ChainReader,
    amm: &Address,
) -> Result<Vec<LpTokenPool>> {
    let (current, collection, amm_id) = tokio::try_join!(
        reader.current_period_index(amm),
        reader.pool_token_address(amm),
        reader.amm_id(amm),
    )?;

    let lookups = PoolId::ALL
        .into_iter()
        .flat_map(|pool| (0..current).map(move |period| (pool, period)))
        .map(|(pool, period_index)| {
            let collection = collection.clone();
            async move {
                let token_id = reader.lp_token_id(amm, amm_id, period_index, pool).await?;
                Ok::<_, apwine_core::TransportError>(LpTokenPool {
                    collection,
                    token_id,
                    pool,
                    period_index,
                })
            }
        });

    let pools = try_join_all(lookups).await?;
    debug!(%amm, periods = current, count = pools.len(), "LP token pools fetched");
    Ok(pools)
}

/// Whether the AMM may move every LP token of `account`
pub async fn is_lp_approved_for_all(
    reader: &dyn ChainReader,
    amm: &Address,
    account: &Address,
) -> Result<bool> {
    let collection = reader.pool_token_address(amm).await?;
    reader.is_approved_for_all(account, amm, &collection).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_client::mock::{addr, LedgerCall, MockLedger};

    #[tokio::test]
    async fn test_fetch_defaults_to_current_period() {
        let ledger = MockLedger::new().with_period_index(4).with_amm_id(2);
        let pool = fetch_lp_token_pool(&ledger, &addr(0x0a), PoolId::One, None)
            .await
            .unwrap();

        assert_eq!(pool.period_index, 4);
        assert_eq!(pool.collection, MockLedger::lp_collection());
        assert_eq!(
            pool.token_id,
            Amount::from(2u32) << 128u32 | Amount::from(4u32) << 64u32 | Amount::from(1u32)
        );
    }

    #[tokio::test]
    async fn test_explicit_period_skips_lookup() {
        let ledger = MockLedger::new().with_period_index(9);
        let pool = fetch_lp_token_pool(&ledger, &addr(0x0a), PoolId::Zero, Some(3))
            .await
            .unwrap();

        assert_eq!(pool.period_index, 3);
        assert!(!ledger.calls().contains(&LedgerCall::CurrentPeriodIndex));
    }

    #[tokio::test]
    async fn test_fetch_all_cross_product() {
        let ledger = MockLedger::new().with_period_index(3);
        let pools = fetch_all_lp_token_pools(&ledger, &addr(0x0a)).await.unwrap();

        let keys: Vec<_> = pools.iter().map(|p| (p.pool, p.period_index)).collect();
        assert_eq!(
            keys,
            vec![
                (PoolId::Zero, 0),
                (PoolId::Zero, 1),
                (PoolId::Zero, 2),
                (PoolId::One, 0),
                (PoolId::One, 1),
                (PoolId::One, 2),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_all_without_periods() {
        let ledger = MockLedger::new();
        let pools = fetch_all_lp_token_pools(&ledger, &addr(0x0a)).await.unwrap();
        assert!(pools.is_empty());
    }

    #[tokio::test]
    async fn test_lp_approval_lookup() {
        let account = addr(0x77);
        let amm = addr(0x0a);
        let ledger = MockLedger::new().with_operator_approval(
            &account,
            &amm,
            &MockLedger::lp_collection(),
        );

        assert!(is_lp_approved_for_all(&ledger, &amm, &account).await.unwrap());
        assert!(!is_lp_approved_for_all(&ledger, &amm, &addr(0x78)).await.unwrap());
    }
}
