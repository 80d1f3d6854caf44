//! Contribution schedule generation.
//!
//! Expands a scenario's cadence into the ordered list of contribution
//! dates inside `[start_date, end_date]`. Dates that do not exist in a
//! given month (day 31 in April) are skipped, never clamped to the
//! nearest valid day.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scenario::{RecurrenceInterval, ScenarioSnapshot};

/// Whether a contribution is the one-off opening purchase or a recurring
/// one. `Initial` orders before `Periodic` on the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContributionKind {
    Initial,
    Periodic,
}

/// One planned contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScheduledContribution {
    pub date: NaiveDate,
    pub kind: ContributionKind,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("This cadence requires a day selection")]
    MissingDaySelection,
    #[error("Expected {expected} selected days, found {actual}")]
    DaySelectionMismatch { expected: u32, actual: u32 },
    #[error("Selected day {day} is outside the valid range for this cadence")]
    DayOutOfRange { day: u32 },
    #[error("The scenario produces no contributions in its date range")]
    EmptySchedule,
}

/// Expand a scenario into its contribution schedule.
///
/// The result is strictly ordered by `(date, kind)` and always non-empty;
/// a scenario whose cadence never lands inside the range is an error, not
/// an empty run.
pub fn generate(
    snapshot: &ScenarioSnapshot,
) -> Result<Vec<ScheduledContribution>, ScheduleError> {
    let mut entries = Vec::new();

    if snapshot.initial_amount > rust_decimal::Decimal::ZERO {
        entries.push(ScheduledContribution {
            date: snapshot.start_date,
            kind: ContributionKind::Initial,
        });
    }

    if snapshot.periodic_amount > rust_decimal::Decimal::ZERO {
        let dates = match snapshot.interval {
            RecurrenceInterval::Daily => daily_dates(snapshot),
            RecurrenceInterval::Weekly => weekly_dates(snapshot)?,
            RecurrenceInterval::Monthly => monthly_dates(snapshot)?,
        };
        entries.extend(dates.into_iter().map(|date| ScheduledContribution {
            date,
            kind: ContributionKind::Periodic,
        }));
    }

    entries.sort();
    if entries.is_empty() {
        return Err(ScheduleError::EmptySchedule);
    }
    Ok(entries)
}

/// The day selection for a weekly or monthly cadence. Its cardinality must
/// equal the frequency, so generation stays safe on a snapshot that
/// bypassed validation.
fn selected_days(
    snapshot: &ScenarioSnapshot,
) -> Result<&std::collections::BTreeSet<u32>, ScheduleError> {
    let days = snapshot
        .custom_days
        .as_ref()
        .ok_or(ScheduleError::MissingDaySelection)?;
    if days.len() as u32 != snapshot.frequency {
        return Err(ScheduleError::DaySelectionMismatch {
            expected: snapshot.frequency,
            actual: days.len() as u32,
        });
    }
    Ok(days)
}

/// Every `frequency` days starting from the start date.
fn daily_dates(snapshot: &ScenarioSnapshot) -> Vec<NaiveDate> {
    let step = snapshot.frequency.max(1) as u64;
    let mut dates = Vec::new();
    let mut cursor = snapshot.start_date;
    while cursor <= snapshot.end_date {
        dates.push(cursor);
        cursor = match cursor.checked_add_days(Days::new(step)) {
            Some(next) => next,
            None => break,
        };
    }
    dates
}

/// The selected weekdays (1 = Monday .. 7 = Sunday) of every week the
/// range touches.
fn weekly_dates(snapshot: &ScenarioSnapshot) -> Result<Vec<NaiveDate>, ScheduleError> {
    let days = selected_days(snapshot)?;

    let week_start = snapshot.start_date
        - chrono::Duration::days(snapshot.start_date.weekday().num_days_from_monday() as i64);

    let mut dates = Vec::new();
    let mut cursor = week_start;
    while cursor <= snapshot.end_date {
        for day in days {
            if !(1..=7).contains(day) {
                return Err(ScheduleError::DayOutOfRange { day: *day });
            }
            let date = cursor + chrono::Duration::days((*day - 1) as i64);
            if date >= snapshot.start_date && date <= snapshot.end_date {
                dates.push(date);
            }
        }
        cursor += chrono::Duration::weeks(1);
    }
    Ok(dates)
}

/// The selected days of month of every month the range touches. A day the
/// month does not have yields no date.
fn monthly_dates(snapshot: &ScenarioSnapshot) -> Result<Vec<NaiveDate>, ScheduleError> {
    let days = selected_days(snapshot)?;

    let mut dates = Vec::new();
    let mut year = snapshot.start_date.year();
    let mut month = snapshot.start_date.month();
    loop {
        let month_start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(ScheduleError::EmptySchedule)?;
        if month_start > snapshot.end_date {
            break;
        }
        for day in days {
            if !(1..=31).contains(day) {
                return Err(ScheduleError::DayOutOfRange { day: *day });
            }
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, *day) {
                if date >= snapshot.start_date && date <= snapshot.end_date {
                    dates.push(date);
                }
            }
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    Ok(dates)
}
