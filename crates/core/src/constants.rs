//! Shared numeric constants for the simulation engine.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal places for money amounts in the reporting currency.
pub const MONEY_SCALE: u32 = 4;

/// Decimal places for acquired unit quantities.
pub const UNIT_SCALE: u32 = 8;

/// Decimal places for allocation weights (percent).
pub const WEIGHT_SCALE: u32 = 4;

/// Decimal places for per-transaction percentage shares.
pub const SHARE_SCALE: u32 = 1;

/// Decimal places for profit percentages.
pub const PROFIT_PCT_SCALE: u32 = 4;

/// The target sum of enabled allocation weights.
pub const TOTAL_WEIGHT: Decimal = dec!(100);

/// Tolerance when checking the 100% weight invariant.
pub const WEIGHT_SUM_TOLERANCE: Decimal = dec!(0.05);
