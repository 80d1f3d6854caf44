//! Deal execution.
//!
//! A pure function from (scenario, schedule, prices) to the deal ledger.
//! Running it twice over the same inputs produces identical output; all
//! I/O happens before it is called.

use rust_decimal::Decimal;

use crate::constants::TOTAL_WEIGHT;
use crate::pricing::PriceTable;
use crate::scenario::ScenarioSnapshot;
use crate::schedule::{ContributionKind, ScheduledContribution};
use crate::utils::{round_money, round_units};

use super::model::DealLog;

/// Execute every scheduled contribution against the price table.
///
/// Each contribution is split across the active allocations by weight.
/// A split with no price at or before its date becomes a skipped ledger
/// entry; the rest of the date executes normally.
pub fn execute(
    snapshot: &ScenarioSnapshot,
    schedule: &[ScheduledContribution],
    prices: &PriceTable,
) -> Vec<DealLog> {
    let allocations = snapshot.active_allocations();
    let cost_factor = Decimal::ONE - snapshot.slippage - snapshot.fee;

    let mut deals = Vec::with_capacity(schedule.len() * allocations.len());
    for entry in schedule {
        let amount = match entry.kind {
            ContributionKind::Initial => snapshot.initial_amount,
            ContributionKind::Periodic => snapshot.periodic_amount,
        };

        for alloc in &allocations {
            let allocated = round_money(amount * alloc.weight / TOTAL_WEIGHT);

            let Some(price) = prices.price_at_or_before(&alloc.asset_code, entry.date) else {
                deals.push(DealLog::skipped(
                    entry.date,
                    entry.kind,
                    &alloc.asset_code,
                    allocated,
                ));
                continue;
            };
            if price <= Decimal::ZERO {
                deals.push(DealLog::skipped(
                    entry.date,
                    entry.kind,
                    &alloc.asset_code,
                    allocated,
                ));
                continue;
            }

            let effective = round_money(allocated * cost_factor);
            let units = round_units(effective / price);
            deals.push(DealLog::executed(
                entry.date,
                entry.kind,
                &alloc.asset_code,
                allocated,
                effective,
                price,
                units,
            ));
        }
    }
    deals
}
