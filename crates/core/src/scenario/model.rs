//! Scenario configuration and allocation normalization.
//!
//! A [`ScenarioConfig`] is the mutable object an application edits; a run
//! always works from an immutable [`ScenarioSnapshot`] taken at start so
//! concurrent edits cannot change a simulation in flight.
//!
//! Allocation weights are percent values. Every normalization operation
//! keeps the enabled weights summing to exactly 100 by letting the last
//! adjusted entry absorb the rounding remainder.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::TOTAL_WEIGHT;
use crate::utils::round_weight;

/// Cadence of periodic contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrenceInterval {
    Daily,
    Weekly,
    Monthly,
}

/// One asset's share of each contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetAllocation {
    pub asset_code: String,
    /// Percent weight, 0 to 100.
    pub weight: Decimal,
    /// Disabled entries keep their weight but take no part in a run.
    pub enabled: bool,
}

impl AssetAllocation {
    pub fn new(asset_code: impl Into<String>) -> Self {
        Self {
            asset_code: asset_code.into(),
            weight: Decimal::ZERO,
            enabled: true,
        }
    }

    fn participates(&self) -> bool {
        self.enabled
    }
}

/// A recurring-investment scenario as edited by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    /// One-off contribution at the start date. Zero disables it.
    pub initial_amount: Decimal,
    /// Amount contributed on every scheduled date.
    pub periodic_amount: Decimal,
    /// Reporting currency code, informational only.
    pub currency: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub interval: RecurrenceInterval,
    /// Contributions per cadence period (every N days, N days per week,
    /// N days per month).
    pub frequency: u32,
    /// Selected weekdays (1 = Monday .. 7 = Sunday) or days of month
    /// (1 .. 31). Required for weekly and monthly cadences.
    pub custom_days: Option<BTreeSet<u32>>,
    pub allocations: Vec<AssetAllocation>,
    /// Fractional price slippage per purchase, 0 to <1.
    pub slippage: Decimal,
    /// Fractional fee per purchase, 0 to <1.
    pub fee: Decimal,
}

impl ScenarioConfig {
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            initial_amount: Decimal::ZERO,
            periodic_amount: Decimal::ZERO,
            currency: "USD".to_string(),
            start_date,
            end_date,
            interval: RecurrenceInterval::Monthly,
            frequency: 1,
            custom_days: Some(BTreeSet::from([1])),
            allocations: Vec::new(),
            slippage: Decimal::ZERO,
            fee: Decimal::ZERO,
        }
    }

    /// Add an asset with zero weight. Adding an existing code is a no-op.
    pub fn add_asset(&mut self, asset_code: &str) {
        if self.allocations.iter().any(|a| a.asset_code == asset_code) {
            return;
        }
        self.allocations.push(AssetAllocation::new(asset_code));
    }

    pub fn remove_asset(&mut self, asset_code: &str) {
        self.allocations.retain(|a| a.asset_code != asset_code);
    }

    /// Set one asset's weight, rounded to the weight scale.
    pub fn update_weight(&mut self, asset_code: &str, weight: Decimal) {
        if let Some(alloc) = self
            .allocations
            .iter_mut()
            .find(|a| a.asset_code == asset_code)
        {
            alloc.weight = round_weight(weight);
        }
    }

    pub fn set_enabled(&mut self, asset_code: &str, enabled: bool) {
        if let Some(alloc) = self
            .allocations
            .iter_mut()
            .find(|a| a.asset_code == asset_code)
        {
            alloc.enabled = enabled;
        }
    }

    /// Give every enabled asset an equal share.
    ///
    /// All but the last enabled entry receive the rounded even share; the
    /// last receives whatever brings the sum to exactly 100.
    pub fn equalize_all(&mut self) {
        let enabled: Vec<usize> = self
            .allocations
            .iter()
            .enumerate()
            .filter(|(_, a)| a.participates())
            .map(|(i, _)| i)
            .collect();
        let count = enabled.len();
        if count == 0 {
            return;
        }

        let base = round_weight(TOTAL_WEIGHT / Decimal::from(count as u64));
        let mut assigned = Decimal::ZERO;
        for (pos, idx) in enabled.iter().enumerate() {
            let weight = if pos + 1 == count {
                TOTAL_WEIGHT - assigned
            } else {
                assigned += base;
                base
            };
            self.allocations[*idx].weight = weight;
        }
    }

    /// Split the unallocated remainder evenly across enabled zero-weight
    /// entries, leaving explicit weights untouched. The last filled entry
    /// absorbs the rounding remainder.
    pub fn fill_remaining_evenly(&mut self) {
        let used: Decimal = self
            .allocations
            .iter()
            .filter(|a| a.participates() && !a.weight.is_zero())
            .map(|a| a.weight)
            .sum();
        let remainder = TOTAL_WEIGHT - used;
        if remainder <= Decimal::ZERO {
            return;
        }

        let empty: Vec<usize> = self
            .allocations
            .iter()
            .enumerate()
            .filter(|(_, a)| a.participates() && a.weight.is_zero())
            .map(|(i, _)| i)
            .collect();
        let count = empty.len();
        if count == 0 {
            return;
        }

        let base = round_weight(remainder / Decimal::from(count as u64));
        let mut assigned = Decimal::ZERO;
        for (pos, idx) in empty.iter().enumerate() {
            let weight = if pos + 1 == count {
                remainder - assigned
            } else {
                assigned += base;
                base
            };
            self.allocations[*idx].weight = weight;
        }
    }

    /// Zero every weight.
    pub fn reset_all(&mut self) {
        for alloc in &mut self.allocations {
            alloc.weight = Decimal::ZERO;
        }
    }

    /// Sum of enabled weights.
    pub fn total_enabled_weight(&self) -> Decimal {
        self.allocations
            .iter()
            .filter(|a| a.participates())
            .map(|a| a.weight)
            .sum()
    }

    /// Whether the enabled weights form a usable distribution: the sum is
    /// within tolerance of 100 and at least one enabled entry is nonzero.
    pub fn is_valid_distribution(&self) -> bool {
        let total = self.total_enabled_weight();
        let within = (total - TOTAL_WEIGHT).abs() <= crate::constants::WEIGHT_SUM_TOLERANCE;
        let any_nonzero = self
            .allocations
            .iter()
            .any(|a| a.participates() && !a.weight.is_zero());
        within && any_nonzero
    }

    /// Enabled allocations with nonzero weight, in declaration order.
    pub fn active_allocations(&self) -> Vec<AssetAllocation> {
        self.allocations
            .iter()
            .filter(|a| a.participates() && !a.weight.is_zero())
            .cloned()
            .collect()
    }

    /// Freeze the current configuration for a run.
    pub fn snapshot(&self) -> ScenarioSnapshot {
        ScenarioSnapshot(self.clone())
    }
}

/// Immutable copy of a [`ScenarioConfig`] taken at run start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSnapshot(ScenarioConfig);

impl ScenarioSnapshot {
    pub fn config(&self) -> &ScenarioConfig {
        &self.0
    }
}

impl std::ops::Deref for ScenarioSnapshot {
    type Target = ScenarioConfig;

    fn deref(&self) -> &ScenarioConfig {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn scenario_with(codes: &[&str]) -> ScenarioConfig {
        let mut config = ScenarioConfig::new(
            "test",
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        for code in codes {
            config.add_asset(code);
        }
        config
    }

    #[test]
    fn test_add_asset_is_idempotent() {
        let mut config = scenario_with(&["BTC"]);
        config.add_asset("BTC");
        assert_eq!(config.allocations.len(), 1);
    }

    #[test]
    fn test_equalize_three_assets_sums_to_exactly_100() {
        let mut config = scenario_with(&["BTC", "ETH", "SOL"]);
        config.equalize_all();

        assert_eq!(config.allocations[0].weight, dec!(33.3333));
        assert_eq!(config.allocations[1].weight, dec!(33.3333));
        assert_eq!(config.allocations[2].weight, dec!(33.3334));
        assert_eq!(config.total_enabled_weight(), dec!(100));
        assert!(config.is_valid_distribution());
    }

    #[test]
    fn test_equalize_skips_disabled_entries() {
        let mut config = scenario_with(&["BTC", "ETH"]);
        config.set_enabled("ETH", false);
        config.equalize_all();

        assert_eq!(config.allocations[0].weight, dec!(100));
        assert_eq!(config.allocations[1].weight, dec!(0));
    }

    #[test]
    fn test_fill_remaining_evenly_absorbs_remainder_in_last() {
        let mut config = scenario_with(&["BTC", "ETH", "SOL", "AAPL"]);
        config.update_weight("BTC", dec!(40));
        config.fill_remaining_evenly();

        assert_eq!(config.allocations[0].weight, dec!(40));
        assert_eq!(config.allocations[1].weight, dec!(20));
        assert_eq!(config.allocations[2].weight, dec!(20));
        assert_eq!(config.allocations[3].weight, dec!(20));
        assert_eq!(config.total_enabled_weight(), dec!(100));
    }

    #[test]
    fn test_fill_remaining_is_a_noop_when_fully_allocated() {
        let mut config = scenario_with(&["BTC", "ETH"]);
        config.update_weight("BTC", dec!(60));
        config.update_weight("ETH", dec!(40));
        let before = config.allocations.clone();
        config.fill_remaining_evenly();
        assert_eq!(config.allocations, before);
    }

    #[test]
    fn test_reset_zeroes_weights() {
        let mut config = scenario_with(&["BTC", "ETH"]);
        config.equalize_all();
        config.reset_all();
        assert_eq!(config.total_enabled_weight(), dec!(0));
        assert!(!config.is_valid_distribution());
    }

    #[test]
    fn test_snapshot_is_independent_of_later_edits() {
        let mut config = scenario_with(&["BTC"]);
        config.update_weight("BTC", dec!(100));
        let snapshot = config.snapshot();
        config.update_weight("BTC", dec!(50));

        assert_eq!(snapshot.allocations[0].weight, dec!(100));
        assert_eq!(config.allocations[0].weight, dec!(50));
    }
}
