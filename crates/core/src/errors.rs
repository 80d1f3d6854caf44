//! Core error types for the simulation engine.
//!
//! The taxonomy mirrors how failures must be handled by callers:
//! configuration errors are detected before any I/O and never retried,
//! resolution errors abort a run entirely, market-data errors may be
//! transient (see [`Error::is_retryable`]), and cancellation is a clean
//! outcome rather than a fault.

use thiserror::Error;

use crate::pricing::ResolutionError;
use crate::scenario::ValidationReport;
use crate::schedule::ScheduleError;
use dcasim_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the simulation engine.
#[derive(Error, Debug)]
pub enum Error {
    /// The scenario configuration failed validation. Detected synchronously
    /// before any price fetch; carries every failed check.
    #[error("Invalid configuration: {0}")]
    Configuration(ValidationReport),

    /// Contribution-date generation failed.
    #[error("Schedule generation failed: {0}")]
    Schedule(#[from] ScheduleError),

    /// An asset could not be resolved or has no usable price history.
    /// Aborts the whole run; a partial simulation would misrepresent the
    /// strategy.
    #[error("Asset resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    /// A market data provider failed.
    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    /// The persistence collaborator failed.
    #[error("Repository error: {0}")]
    Repository(String),

    /// The run was cancelled before completion. Not a fault; the session
    /// returns to idle with no partial state.
    #[error("Simulation cancelled")]
    Cancelled,
}

impl Error {
    /// True when retrying the identical run later could succeed
    /// (transient provider I/O). The engine itself never auto-retries;
    /// retry policy belongs to the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::MarketData(e) if e.is_transient())
    }

    /// True for clean cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_data_timeout_is_retryable() {
        let err = Error::MarketData(MarketDataError::Timeout {
            provider: "BINANCE".to_string(),
        });
        assert!(err.is_retryable());
    }

    #[test]
    fn test_resolution_error_is_not_retryable() {
        let err = Error::Resolution(ResolutionError::HistoricalDataUnavailable {
            code: "BTC".to_string(),
        });
        assert!(!err.is_retryable());
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_cancelled_classification() {
        assert!(Error::Cancelled.is_cancelled());
        assert!(!Error::Cancelled.is_retryable());
    }
}
