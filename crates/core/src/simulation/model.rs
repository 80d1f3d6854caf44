//! Simulation run outputs.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::ContributionKind;

/// Ledger entry for one asset purchase attempt on one scheduled date.
///
/// Skipped entries record dates where no price at or before the
/// contribution date existed; they stay in the ledger so a run's schedule
/// is fully accounted for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealLog {
    pub date: NaiveDate,
    pub kind: ContributionKind,
    pub symbol: String,
    /// Capital allocated to this asset before costs.
    pub amount: Decimal,
    /// Capital converted to units after slippage and fee.
    pub effective_amount: Decimal,
    pub price: Decimal,
    pub units: Decimal,
    pub skipped: bool,
}

impl DealLog {
    pub fn executed(
        date: NaiveDate,
        kind: ContributionKind,
        symbol: impl Into<String>,
        amount: Decimal,
        effective_amount: Decimal,
        price: Decimal,
        units: Decimal,
    ) -> Self {
        Self {
            date,
            kind,
            symbol: symbol.into(),
            amount,
            effective_amount,
            price,
            units,
            skipped: false,
        }
    }

    pub fn skipped(
        date: NaiveDate,
        kind: ContributionKind,
        symbol: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            date,
            kind,
            symbol: symbol.into(),
            amount,
            effective_amount: Decimal::ZERO,
            price: Decimal::ZERO,
            units: Decimal::ZERO,
            skipped: true,
        }
    }

    pub fn is_executed(&self) -> bool {
        !self.skipped
    }
}

/// Per-asset position at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub symbol: String,
    pub total_units: Decimal,
    pub invested: Decimal,
    /// Money spent per unit acquired. Zero when no units were acquired.
    pub avg_cost: Decimal,
    pub current_price: Decimal,
    pub current_value: Decimal,
    pub profit: Decimal,
    pub profit_pct: Decimal,
    /// True when the asset has no usable closing price for valuation.
    pub unpriced: bool,
}

/// Full outcome of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub scenario_name: String,
    pub run_at: DateTime<Utc>,
    pub total_invested: Decimal,
    pub current_value: Decimal,
    pub profit: Decimal,
    pub profit_pct: Decimal,
    /// Largest peak-to-trough decline of the portfolio value across
    /// contribution dates, as a percent of the peak.
    pub max_drawdown_pct: Decimal,
    pub executed_deal_count: usize,
    pub skipped_deal_count: usize,
    pub deals: Vec<DealLog>,
    pub breakdown: Vec<BreakdownRow>,
}

/// Condensed view of a stored run, for history listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRunSummary {
    pub id: Uuid,
    pub scenario_name: String,
    pub run_at: DateTime<Utc>,
    pub total_invested: Decimal,
    pub profit_pct: Decimal,
}
