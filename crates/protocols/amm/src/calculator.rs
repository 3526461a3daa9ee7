//! Slippage Calculator
//!
//! Integer basis-point bounds around a router quote. No floating point: the
//! tolerance is a decimal percent, converted to whole basis points before it
//! touches the amount.

use apwine_core::Amount;
use num_traits::Zero;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::constants::{bps, slippage};
use crate::state::{SwapDirection, SwapError};

/// Reject tolerances outside `0.1..=100` percent
pub fn validate_tolerance(percent: Decimal) -> Result<(), SwapError> {
    if percent < slippage::MIN_TOLERANCE_PERCENT || percent > slippage::MAX_TOLERANCE_PERCENT {
        return Err(SwapError::FaultySlippage { tolerance: percent });
    }
    Ok(())
}

/// Percent to whole basis points, truncated toward zero
pub fn percent_to_bps(percent: Decimal) -> i128 {
    percent
        .saturating_mul(Decimal::from(bps::PER_PERCENT))
        .trunc()
        .to_i128()
        .unwrap_or_default()
}

/// `amount * (10000 + bps) / 10000`, remainder dropped.
///
/// Positive percents raise the amount, negative ones lower it. A factor
/// below zero saturates at zero.
pub fn apply_bound(amount: &Amount, percent: Decimal) -> Amount {
    let factor = i128::from(bps::SCALE) + percent_to_bps(percent);
    if factor <= 0 {
        return Amount::zero();
    }
    amount * Amount::from(factor as u128) / Amount::from(bps::SCALE)
}

/// Bound protecting the caller against price movement.
///
/// Exact-in swaps get a minimum output below the quote, exact-out swaps a
/// maximum input above it.
pub fn protected_bound(direction: SwapDirection, quote: &Amount, tolerance: Decimal) -> Amount {
    match direction {
        SwapDirection::In => apply_bound(quote, -tolerance),
        SwapDirection::Out => apply_bound(quote, tolerance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amt(n: u64) -> Amount {
        Amount::from(n)
    }

    #[test]
    fn test_apply_bound_symmetric_ten_percent() {
        assert_eq!(apply_bound(&amt(1000), dec!(10)), amt(1100));
        assert_eq!(apply_bound(&amt(1000), dec!(-10)), amt(900));
    }

    #[test]
    fn test_zero_percent_is_identity() {
        for n in [0u64, 1, 999, 123_456_789] {
            assert_eq!(apply_bound(&amt(n), Decimal::ZERO), amt(n));
        }
    }

    #[test]
    fn test_remainder_truncated() {
        // 0.123% -> 12 bps
        assert_eq!(percent_to_bps(dec!(0.123)), 12);
        assert_eq!(apply_bound(&amt(1000), dec!(0.123)), amt(1001));
        assert_eq!(apply_bound(&amt(999), dec!(-0.5)), amt(994));
    }

    #[test]
    fn test_negative_bps_truncate_toward_zero() {
        assert_eq!(percent_to_bps(dec!(-0.125)), -12);
    }

    #[test]
    fn test_negative_factor_saturates() {
        assert_eq!(apply_bound(&amt(1000), dec!(-100)), amt(0));
        assert_eq!(apply_bound(&amt(1000), dec!(-150)), amt(0));
    }

    #[test]
    fn test_large_amounts() {
        let wei = Amount::from(10u32).pow(30u32);
        let bound = apply_bound(&wei, dec!(0.5));
        assert_eq!(bound, Amount::from(10u32).pow(30u32) * 1005u32 / 1000u32);
    }

    #[test]
    fn test_validate_tolerance_range() {
        assert!(validate_tolerance(dec!(0.1)).is_ok());
        assert!(validate_tolerance(dec!(0.5)).is_ok());
        assert!(validate_tolerance(dec!(100)).is_ok());

        for bad in [dec!(0), dec!(0.09), dec!(100.01), dec!(-1), dec!(101)] {
            assert_eq!(
                validate_tolerance(bad),
                Err(SwapError::FaultySlippage { tolerance: bad })
            );
        }
    }

    #[test]
    fn test_protected_bound_direction() {
        assert_eq!(
            protected_bound(SwapDirection::In, &amt(1000), dec!(1)),
            amt(990)
        );
        assert_eq!(
            protected_bound(SwapDirection::Out, &amt(1000), dec!(1)),
            amt(1010)
        );
    }
}
