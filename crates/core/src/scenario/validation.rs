//! Pre-run scenario validation.
//!
//! Validation is exhaustive rather than fail-fast: the report carries every
//! failed check so a caller can surface all of them at once.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use super::model::{RecurrenceInterval, ScenarioConfig};

/// One failed validation check.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationFailure {
    #[error("Initial amount must not be negative")]
    NegativeInitialAmount,
    #[error("Periodic amount must not be negative")]
    NegativePeriodicAmount,
    #[error("At least one contribution amount must be positive")]
    NoContribution,
    #[error("Start date must be before end date")]
    InvertedDateRange,
    #[error("Slippage must be at least 0 and below 1")]
    SlippageOutOfRange,
    #[error("Fee must be at least 0 and below 1")]
    FeeOutOfRange,
    #[error("Combined slippage and fee must be below 1")]
    CostsExceedContribution,
    #[error("Frequency must be at least 1")]
    ZeroFrequency,
    #[error("Frequency {frequency} exceeds the maximum of {max} for this cadence")]
    FrequencyTooHigh { frequency: u32, max: u32 },
    #[error("This cadence requires a day selection")]
    MissingDaySelection,
    #[error("Expected {expected} selected days, found {actual}")]
    DaySelectionMismatch { expected: u32, actual: u32 },
    #[error("Selected day {day} is outside the range {min} to {max}")]
    DayOutOfRange { day: u32, min: u32, max: u32 },
    #[error("At least one asset allocation is required")]
    NoAllocations,
    #[error("Weight for {asset_code} must be between 0 and 100")]
    WeightOutOfRange { asset_code: String },
    #[error("Enabled weights must sum to 100, found {total}")]
    WeightSumMismatch { total: Decimal },
}

/// Outcome of validating a scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub reasons: Vec<ValidationFailure>,
}

impl ValidationReport {
    pub fn is_ready(&self) -> bool {
        self.reasons.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reasons.is_empty() {
            return write!(f, "ready");
        }
        let joined: Vec<String> = self.reasons.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", joined.join("; "))
    }
}

/// Run every check against a scenario and collect the failures.
pub fn validate(config: &ScenarioConfig) -> ValidationReport {
    let mut reasons = Vec::new();

    if config.initial_amount < Decimal::ZERO {
        reasons.push(ValidationFailure::NegativeInitialAmount);
    }
    if config.periodic_amount < Decimal::ZERO {
        reasons.push(ValidationFailure::NegativePeriodicAmount);
    }
    if config.initial_amount <= Decimal::ZERO && config.periodic_amount <= Decimal::ZERO {
        reasons.push(ValidationFailure::NoContribution);
    }
    if config.start_date >= config.end_date {
        reasons.push(ValidationFailure::InvertedDateRange);
    }

    let unit = Decimal::ONE;
    if config.slippage < Decimal::ZERO || config.slippage >= unit {
        reasons.push(ValidationFailure::SlippageOutOfRange);
    }
    if config.fee < Decimal::ZERO || config.fee >= unit {
        reasons.push(ValidationFailure::FeeOutOfRange);
    }
    if config.slippage >= Decimal::ZERO
        && config.fee >= Decimal::ZERO
        && config.slippage + config.fee >= unit
    {
        reasons.push(ValidationFailure::CostsExceedContribution);
    }

    validate_cadence(config, &mut reasons);
    validate_allocations(config, &mut reasons);

    ValidationReport { reasons }
}

fn validate_cadence(config: &ScenarioConfig, reasons: &mut Vec<ValidationFailure>) {
    if config.frequency == 0 {
        reasons.push(ValidationFailure::ZeroFrequency);
        return;
    }

    let (min, max, cap) = match config.interval {
        RecurrenceInterval::Daily => return,
        RecurrenceInterval::Weekly => (1u32, 7u32, 7u32),
        RecurrenceInterval::Monthly => (1u32, 31u32, 12u32),
    };
    if config.frequency > cap {
        reasons.push(ValidationFailure::FrequencyTooHigh {
            frequency: config.frequency,
            max: cap,
        });
    }

    let Some(days) = &config.custom_days else {
        reasons.push(ValidationFailure::MissingDaySelection);
        return;
    };
    if days.len() as u32 != config.frequency {
        reasons.push(ValidationFailure::DaySelectionMismatch {
            expected: config.frequency,
            actual: days.len() as u32,
        });
    }
    for day in days {
        if *day < min || *day > max {
            reasons.push(ValidationFailure::DayOutOfRange {
                day: *day,
                min,
                max,
            });
        }
    }
}

fn validate_allocations(config: &ScenarioConfig, reasons: &mut Vec<ValidationFailure>) {
    if config.allocations.is_empty() {
        reasons.push(ValidationFailure::NoAllocations);
        return;
    }

    let hundred = crate::constants::TOTAL_WEIGHT;
    for alloc in &config.allocations {
        if alloc.weight < Decimal::ZERO || alloc.weight > hundred {
            reasons.push(ValidationFailure::WeightOutOfRange {
                asset_code: alloc.asset_code.clone(),
            });
        }
    }

    if !config.is_valid_distribution() {
        reasons.push(ValidationFailure::WeightSumMismatch {
            total: config.total_enabled_weight(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::collections::BTreeSet;

    fn ready_scenario() -> ScenarioConfig {
        let mut config = ScenarioConfig::new(
            "test",
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        config.periodic_amount = dec!(500);
        config.add_asset("BTC");
        config.update_weight("BTC", dec!(100));
        config
    }

    #[test]
    fn test_well_formed_scenario_is_ready() {
        let report = validate(&ready_scenario());
        assert!(report.is_ready(), "unexpected failures: {report}");
    }

    #[test]
    fn test_inverted_range_and_missing_contribution() {
        let mut config = ready_scenario();
        config.periodic_amount = Decimal::ZERO;
        config.end_date = config.start_date;
        let report = validate(&config);

        assert!(report.reasons.contains(&ValidationFailure::NoContribution));
        assert!(report
            .reasons
            .contains(&ValidationFailure::InvertedDateRange));
    }

    #[test]
    fn test_slippage_and_fee_bounds() {
        let mut config = ready_scenario();
        config.slippage = dec!(1);
        let report = validate(&config);
        assert!(report
            .reasons
            .contains(&ValidationFailure::SlippageOutOfRange));

        let mut config = ready_scenario();
        config.fee = dec!(-0.01);
        let report = validate(&config);
        assert!(report.reasons.contains(&ValidationFailure::FeeOutOfRange));

        let mut config = ready_scenario();
        config.slippage = dec!(0.6);
        config.fee = dec!(0.5);
        let report = validate(&config);
        assert!(report
            .reasons
            .contains(&ValidationFailure::CostsExceedContribution));
    }

    #[test]
    fn test_weekly_day_selection_must_match_frequency() {
        let mut config = ready_scenario();
        config.interval = RecurrenceInterval::Weekly;
        config.frequency = 2;
        config.custom_days = Some(BTreeSet::from([1]));
        let report = validate(&config);
        assert!(report.reasons.contains(&ValidationFailure::DaySelectionMismatch {
            expected: 2,
            actual: 1
        }));
    }

    #[test]
    fn test_weekly_day_out_of_range() {
        let mut config = ready_scenario();
        config.interval = RecurrenceInterval::Weekly;
        config.frequency = 1;
        config.custom_days = Some(BTreeSet::from([8]));
        let report = validate(&config);
        assert!(report.reasons.contains(&ValidationFailure::DayOutOfRange {
            day: 8,
            min: 1,
            max: 7
        }));
    }

    #[test]
    fn test_weight_sum_must_be_100() {
        let mut config = ready_scenario();
        config.update_weight("BTC", dec!(80));
        let report = validate(&config);
        assert!(report
            .reasons
            .iter()
            .any(|r| matches!(r, ValidationFailure::WeightSumMismatch { .. })));
    }

    #[test]
    fn test_daily_cadence_needs_no_day_selection() {
        let mut config = ready_scenario();
        config.interval = RecurrenceInterval::Daily;
        config.frequency = 3;
        config.custom_days = None;
        let report = validate(&config);
        assert!(report.is_ready(), "unexpected failures: {report}");
    }
}
