//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all market data operations
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while fetching historical price series.
///
/// Each variant is classified into a [`RetryClass`] via the
/// [`retry_class`](Self::retry_class) method, which tells the caller whether
/// retrying the run could possibly succeed.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    /// This is a terminal error - retrying won't help.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The instrument shape does not match what the backend expects,
    /// e.g. passing an FX pair to the crypto backend.
    #[error("Unsupported instrument for provider {provider}: {detail}")]
    UnsupportedInstrument {
        /// The provider that rejected the instrument
        provider: String,
        /// Description of the mismatch
        detail: String,
    },

    /// The symbol exists but has no quotes in the requested period.
    #[error("No data for date range: {symbol}")]
    NoDataForRange {
        /// The symbol with an empty series
        symbol: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred (bad payload, HTTP 5xx, ...).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// No registered backend supports the requested instrument kind.
    #[error("No provider registered for kind: {kind}")]
    NoProviderForKind {
        /// The unsupported kind
        kind: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// - [`RetryClass::Never`]: Don't retry, the error is terminal
    /// - [`RetryClass::WithBackoff`]: Retry the run later
    /// - [`RetryClass::NextProvider`]: A different backend might succeed
    ///
    /// # Examples
    ///
    /// ```
    /// use dcasim_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::RateLimited { provider: "BINANCE".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = MarketDataError::SymbolNotFound("INVALID".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            // Terminal errors - never retry
            Self::SymbolNotFound(_)
            | Self::UnsupportedInstrument { .. }
            | Self::NoDataForRange { .. }
            | Self::NoProviderForKind { .. } => RetryClass::Never,

            // Transient errors - retry with backoff
            Self::RateLimited { .. } | Self::Timeout { .. } | Self::Network(_) => {
                RetryClass::WithBackoff
            }

            // Provider-specific failures - a different backend might succeed
            Self::ProviderError { .. } => RetryClass::NextProvider,
        }
    }

    /// True when a later attempt with identical parameters could succeed.
    pub fn is_transient(&self) -> bool {
        self.retry_class() == RetryClass::WithBackoff
    }
}
