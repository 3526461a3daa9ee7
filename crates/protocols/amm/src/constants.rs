//! AMM Constants
//!
//! Fixed-point scales, slippage limits and default bounds.

/// Basis-point fixed-point scale
pub mod bps {
    /// 100% in basis points
    pub const SCALE: u64 = 10_000;

    /// Basis points per whole percent
    pub const PER_PERCENT: u64 = 100;
}

/// Slippage tolerance limits (percent)
pub mod slippage {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// Smallest accepted tolerance
    pub const MIN_TOLERANCE_PERCENT: Decimal = dec!(0.1);

    /// Largest accepted tolerance
    pub const MAX_TOLERANCE_PERCENT: Decimal = dec!(100);
}

/// Default liquidity bounds
pub mod liquidity {
    use apwine_core::Amount;
    use num_traits::One;

    /// `type(int256).max`, the "no limit" bound for `addLiquidity`
    pub fn max_int256() -> Amount {
        (Amount::one() << 255u32) - Amount::one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_int256() {
        let max = liquidity::max_int256();
        assert_eq!(max.bits(), 255);
        assert_eq!(
            max.to_string(),
            "57896044618658097711785492504343953926634992332820282019728792003956564819967"
        );
    }

    #[test]
    fn test_tolerance_limits_ordered() {
        assert!(slippage::MIN_TOLERANCE_PERCENT < slippage::MAX_TOLERANCE_PERCENT);
    }
}
