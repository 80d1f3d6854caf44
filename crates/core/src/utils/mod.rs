//! Rounding helpers for fixed-point arithmetic.
//!
//! All monetary math in the engine uses bankers rounding at the scales
//! defined in [`crate::constants`], so two runs over the same inputs always
//! produce identical ledgers.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::{MONEY_SCALE, PROFIT_PCT_SCALE, SHARE_SCALE, UNIT_SCALE, WEIGHT_SCALE};

/// Round a money amount to the reporting-currency scale.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Round a unit quantity.
pub fn round_units(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(UNIT_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Round an allocation weight (percent).
pub fn round_weight(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(WEIGHT_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Round a per-transaction percentage share.
pub fn round_share(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(SHARE_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Round a profit percentage.
pub fn round_profit_pct(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PROFIT_PCT_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Division that defines `x / 0 == 0`.
///
/// Financial ratios in this engine (profit percent, average cost) are
/// defined as zero when the denominator is zero.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}
