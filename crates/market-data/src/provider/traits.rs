//! Historical price provider trait definition.
//!
//! This module defines the core `HistoricalPriceProvider` trait that all
//! price series backends must implement.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::MarketDataError;
use crate::models::{PricePoint, ProviderInstrument, ProviderKind};

/// Trait for historical price series backends.
///
/// Implement this trait to add support for a new data source. The registry
/// routes each instrument to the first provider (by priority) that supports
/// its kind.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use dcasim_market_data::provider::HistoricalPriceProvider;
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl HistoricalPriceProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn supports(&self, kind: ProviderKind) -> bool {
///         kind == ProviderKind::Equity
///     }
///
///     // ... implement fetch_history
/// }
/// ```
#[async_trait]
pub trait HistoricalPriceProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "BINANCE", "FRANKFURTER", etc.
    /// Used for logging and error attribution.
    fn id(&self) -> &'static str;

    /// Provider priority for ordering.
    ///
    /// Lower values = higher priority. Default is 10. The registry uses
    /// this to order providers when multiple support the same kind.
    fn priority(&self) -> u8 {
        10
    }

    /// Whether this backend can serve instruments of the given kind.
    fn supports(&self, kind: ProviderKind) -> bool;

    /// Fetch the daily close series for an instrument.
    ///
    /// # Arguments
    ///
    /// * `instrument` - The provider-specific instrument parameters
    /// * `start` - Start of the date range (inclusive)
    /// * `end` - End of the date range (inclusive)
    ///
    /// # Returns
    ///
    /// Price points ordered by date ascending, at most one per calendar day.
    /// An empty vector means the provider has no data in the range; callers
    /// decide whether that is fatal.
    async fn fetch_history(
        &self,
        instrument: &ProviderInstrument,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, MarketDataError>;
}
