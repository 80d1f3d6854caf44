//! Result aggregation.
//!
//! Folds the deal ledger into per-asset positions and run totals. Pure:
//! the run timestamp is supplied by the caller, so the same ledger always
//! aggregates to the same result.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::pricing::PriceTable;
use crate::scenario::ScenarioSnapshot;
use crate::utils::{round_money, round_profit_pct, safe_div};

use super::model::{BreakdownRow, DealLog, SimulationResult};

/// Aggregate a deal ledger into the final run result.
///
/// Skipped deals contribute nothing to totals but are counted and kept in
/// the ledger. Valuation uses each asset's latest close in the table; an
/// asset with none is carried at zero and flagged unpriced.
pub fn aggregate(
    snapshot: &ScenarioSnapshot,
    deals: Vec<DealLog>,
    prices: &PriceTable,
    run_at: DateTime<Utc>,
) -> SimulationResult {
    let breakdown: Vec<BreakdownRow> = snapshot
        .active_allocations()
        .iter()
        .map(|alloc| breakdown_row(&alloc.asset_code, &deals, prices))
        .collect();

    let total_invested: Decimal = breakdown.iter().map(|r| r.invested).sum();
    let current_value: Decimal = breakdown.iter().map(|r| r.current_value).sum();
    let profit = current_value - total_invested;

    let executed_deal_count = deals.iter().filter(|d| d.is_executed()).count();
    let skipped_deal_count = deals.len() - executed_deal_count;
    let max_drawdown_pct = max_drawdown_pct(&deals, prices);

    SimulationResult {
        scenario_name: snapshot.name.clone(),
        run_at,
        total_invested,
        current_value,
        profit,
        profit_pct: round_profit_pct(safe_div(profit, total_invested) * Decimal::ONE_HUNDRED),
        max_drawdown_pct,
        executed_deal_count,
        skipped_deal_count,
        deals,
        breakdown,
    }
}

/// Largest peak-to-trough decline of the portfolio value, sampled at each
/// contribution date and valued with the closes in effect on that date.
///
/// Relies on the ledger being grouped by date in ascending order, which is
/// how the engine emits it.
fn max_drawdown_pct(deals: &[DealLog], prices: &PriceTable) -> Decimal {
    let mut held: HashMap<&str, Decimal> = HashMap::new();
    let mut peak = Decimal::ZERO;
    let mut max_drawdown = Decimal::ZERO;

    let mut idx = 0;
    while idx < deals.len() {
        let date = deals[idx].date;
        while idx < deals.len() && deals[idx].date == date {
            let deal = &deals[idx];
            if deal.is_executed() {
                *held.entry(deal.symbol.as_str()).or_default() += deal.units;
            }
            idx += 1;
        }

        let value: Decimal = held
            .iter()
            .map(|(symbol, units)| {
                prices
                    .price_at_or_before(symbol, date)
                    .map(|price| *units * price)
                    .unwrap_or_default()
            })
            .sum();

        if value > peak {
            peak = value;
        } else if peak > Decimal::ZERO {
            let drawdown = (peak - value) / peak;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }
    }

    round_profit_pct(max_drawdown * Decimal::ONE_HUNDRED)
}

fn breakdown_row(symbol: &str, deals: &[DealLog], prices: &PriceTable) -> BreakdownRow {
    let executed = deals
        .iter()
        .filter(|d| d.symbol == symbol && d.is_executed());

    let mut total_units = Decimal::ZERO;
    let mut invested = Decimal::ZERO;
    for deal in executed {
        total_units += deal.units;
        invested += deal.amount;
    }

    let (current_price, unpriced) = match prices.latest_price(symbol) {
        Some(price) => (price, false),
        None => (Decimal::ZERO, true),
    };
    let current_value = round_money(total_units * current_price);
    let profit = current_value - invested;

    BreakdownRow {
        symbol: symbol.to_string(),
        total_units,
        invested,
        avg_cost: round_money(safe_div(invested, total_units)),
        current_price,
        current_value,
        profit,
        profit_pct: round_profit_pct(safe_div(profit, invested) * Decimal::ONE_HUNDRED),
        unpriced,
    }
}
