use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use dcasim_market_data::PricePoint;

/// Daily close series for every asset in a run, keyed by asset code.
///
/// Lookups are last-observation-carried-forward: the close on or before
/// the requested date. Markets that close on weekends and holidays still
/// price a Saturday contribution at Friday's close.
#[derive(Debug, Default, Clone)]
pub struct PriceTable {
    series: HashMap<String, BTreeMap<NaiveDate, Decimal>>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a series under an asset code, replacing any existing one.
    pub fn insert_series(&mut self, code: impl Into<String>, points: Vec<PricePoint>) {
        let series = points.into_iter().map(|p| (p.date, p.close)).collect();
        self.series.insert(code.into(), series);
    }

    pub fn has_series(&self, code: &str) -> bool {
        self.series.contains_key(code)
    }

    /// The close on `date`, or the most recent close before it. `None`
    /// when the series has no observation at or before the date.
    pub fn price_at_or_before(&self, code: &str, date: NaiveDate) -> Option<Decimal> {
        self.series
            .get(code)?
            .range(..=date)
            .next_back()
            .map(|(_, close)| *close)
    }

    /// The last close in the series, used for end-of-run valuation.
    pub fn latest_price(&self, code: &str) -> Option<Decimal> {
        self.series
            .get(code)?
            .iter()
            .next_back()
            .map(|(_, close)| *close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table() -> PriceTable {
        let mut table = PriceTable::new();
        table.insert_series(
            "BTC",
            vec![
                PricePoint::new(date(2023, 1, 2), dec!(20000)),
                PricePoint::new(date(2023, 1, 6), dec!(21000)),
                PricePoint::new(date(2023, 1, 9), dec!(19000)),
            ],
        );
        table
    }

    #[test]
    fn test_exact_date_hit() {
        assert_eq!(
            table().price_at_or_before("BTC", date(2023, 1, 6)),
            Some(dec!(21000))
        );
    }

    #[test]
    fn test_gap_carries_last_observation_forward() {
        // Weekend gap: the 7th and 8th resolve to Friday the 6th
        assert_eq!(
            table().price_at_or_before("BTC", date(2023, 1, 8)),
            Some(dec!(21000))
        );
    }

    #[test]
    fn test_before_first_observation_is_none() {
        assert_eq!(table().price_at_or_before("BTC", date(2023, 1, 1)), None);
    }

    #[test]
    fn test_latest_price() {
        assert_eq!(table().latest_price("BTC"), Some(dec!(19000)));
        assert_eq!(table().latest_price("ETH"), None);
    }
}
