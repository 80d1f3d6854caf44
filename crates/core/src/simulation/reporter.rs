//! Transaction reporting.
//!
//! Regroups the per-asset deal ledger into user-facing transactions, one
//! per contribution date and kind, with a percentage split that always
//! reconciles to exactly 100.0.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::schedule::ContributionKind;
use crate::utils::{round_share, safe_div};

use super::model::DealLog;

/// One asset's share of a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetTransaction {
    pub symbol: String,
    pub amount: Decimal,
    /// Share of the transaction total, one decimal place.
    pub percentage: Decimal,
    pub units: Decimal,
    pub price: Decimal,
}

/// All purchases made on one date for one contribution kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub kind: ContributionKind,
    pub total: Decimal,
    pub distribution: Vec<AssetTransaction>,
}

/// Contribution totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub total: Decimal,
    pub deal_count: usize,
}

/// Group executed deals into transactions, ordered by date then kind.
///
/// A date where every deal was skipped yields no transaction. Each
/// transaction's distribution is ordered by descending amount; every entry
/// except the final (smallest) one is rounded to one decimal place, and the
/// smallest takes 100 minus the rest so the column sums to exactly 100.0.
pub fn transactions(deals: &[DealLog]) -> Vec<Transaction> {
    let mut groups: BTreeMap<(NaiveDate, ContributionKind), Vec<&DealLog>> = BTreeMap::new();
    for deal in deals.iter().filter(|d| d.is_executed()) {
        groups.entry((deal.date, deal.kind)).or_default().push(deal);
    }

    groups
        .into_iter()
        .map(|((date, kind), group)| {
            let total: Decimal = group.iter().map(|d| d.amount).sum();
            Transaction {
                date,
                kind,
                total,
                distribution: distribution(&group, total),
            }
        })
        .collect()
}

fn distribution(group: &[&DealLog], total: Decimal) -> Vec<AssetTransaction> {
    // Descending by amount; the final, smallest entry is the
    // reconciliation entry.
    let mut ordered: Vec<&DealLog> = group.to_vec();
    ordered.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.symbol.cmp(&b.symbol)));

    let count = ordered.len();
    let mut assigned = Decimal::ZERO;
    ordered
        .iter()
        .enumerate()
        .map(|(pos, deal)| {
            let percentage = if pos + 1 == count {
                Decimal::ONE_HUNDRED - assigned
            } else {
                let share = round_share(safe_div(deal.amount, total) * Decimal::ONE_HUNDRED);
                assigned += share;
                share
            };
            AssetTransaction {
                symbol: deal.symbol.clone(),
                amount: deal.amount,
                percentage,
                units: deal.units,
                price: deal.price,
            }
        })
        .collect()
}

/// Executed contribution totals per calendar month, ascending.
pub fn monthly_summaries(deals: &[DealLog]) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<(i32, u32), (Decimal, usize)> = BTreeMap::new();
    for deal in deals.iter().filter(|d| d.is_executed()) {
        let entry = months
            .entry((deal.date.year(), deal.date.month()))
            .or_default();
        entry.0 += deal.amount;
        entry.1 += 1;
    }

    months
        .into_iter()
        .map(|((year, month), (total, deal_count))| MonthlySummary {
            year,
            month,
            total,
            deal_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn deal(symbol: &str, amount: Decimal) -> DealLog {
        DealLog::executed(
            date(2023, 3, 15),
            ContributionKind::Periodic,
            symbol,
            amount,
            amount,
            dec!(100),
            amount / dec!(100),
        )
    }

    #[test]
    fn test_percentages_reconcile_to_exactly_100() {
        let deals = vec![
            deal("BTC", dec!(333.3333)),
            deal("ETH", dec!(333.3333)),
            deal("SOL", dec!(333.3334)),
        ];
        let txns = transactions(&deals);
        assert_eq!(txns.len(), 1);

        let sum: Decimal = txns[0].distribution.iter().map(|d| d.percentage).sum();
        assert_eq!(sum, dec!(100.0));
        // Descending by amount; the final, smallest entry reconciles
        assert_eq!(txns[0].distribution[0].symbol, "SOL");
        assert_eq!(txns[0].distribution[0].percentage, dec!(33.3));
        assert_eq!(txns[0].distribution[2].symbol, "ETH");
        assert_eq!(txns[0].distribution[2].percentage, dec!(33.4));
    }

    #[test]
    fn test_smallest_entry_takes_the_reconciliation_remainder() {
        let deals = vec![
            deal("BTC", dec!(400.05)),
            deal("ETH", dec!(200.00)),
            deal("SOL", dec!(99.95)),
        ];
        let txns = transactions(&deals);
        let dist = &txns[0].distribution;

        // 400.05/700 and 200/700 round independently to 57.2 and 28.6;
        // the smallest entry gets 100 - 85.8, not its own rounding (14.3)
        assert_eq!(dist[0].symbol, "BTC");
        assert_eq!(dist[0].percentage, dec!(57.2));
        assert_eq!(dist[1].symbol, "ETH");
        assert_eq!(dist[1].percentage, dec!(28.6));
        assert_eq!(dist[2].symbol, "SOL");
        assert_eq!(dist[2].percentage, dec!(14.2));

        let sum: Decimal = dist.iter().map(|d| d.percentage).sum();
        assert_eq!(sum, dec!(100.0));
    }

    #[test]
    fn test_initial_and_periodic_on_same_date_stay_separate() {
        let mut initial = deal("BTC", dec!(1000));
        initial.kind = ContributionKind::Initial;
        let deals = vec![initial, deal("BTC", dec!(500))];

        let txns = transactions(&deals);
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].kind, ContributionKind::Initial);
        assert_eq!(txns[0].total, dec!(1000));
        assert_eq!(txns[1].kind, ContributionKind::Periodic);
        assert_eq!(txns[1].total, dec!(500));
    }

    #[test]
    fn test_fully_skipped_date_yields_no_transaction() {
        let deals = vec![DealLog::skipped(
            date(2023, 3, 15),
            ContributionKind::Periodic,
            "BTC",
            dec!(500),
        )];
        assert!(transactions(&deals).is_empty());
    }

    #[test]
    fn test_single_asset_is_100_percent() {
        let deals = vec![deal("BTC", dec!(500))];
        let txns = transactions(&deals);
        assert_eq!(txns[0].distribution[0].percentage, dec!(100.0));
    }

    #[test]
    fn test_monthly_summaries_group_by_calendar_month() {
        let mut feb = deal("BTC", dec!(500));
        feb.date = date(2023, 2, 15);
        let deals = vec![
            feb,
            deal("BTC", dec!(300)),
            deal("ETH", dec!(200)),
            DealLog::skipped(date(2023, 3, 20), ContributionKind::Periodic, "SOL", dec!(100)),
        ];

        let summaries = monthly_summaries(&deals);
        assert_eq!(
            summaries,
            vec![
                MonthlySummary {
                    year: 2023,
                    month: 2,
                    total: dec!(500),
                    deal_count: 1
                },
                MonthlySummary {
                    year: 2023,
                    month: 3,
                    total: dec!(500),
                    deal_count: 2
                },
            ]
        );
    }
}
