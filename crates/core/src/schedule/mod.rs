mod generator;

pub use generator::{generate, ContributionKind, ScheduleError, ScheduledContribution};
