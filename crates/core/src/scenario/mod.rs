mod model;
mod validation;

pub use model::{AssetAllocation, RecurrenceInterval, ScenarioConfig, ScenarioSnapshot};
pub use validation::{validate, ValidationFailure, ValidationReport};
