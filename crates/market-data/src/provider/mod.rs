//! Price series backends.
//!
//! One module per data source. All backends implement
//! [`HistoricalPriceProvider`] and are selected through the registry by
//! instrument kind.

pub mod binance;
pub mod frankfurter;
pub mod marketdata_app;
pub mod metal_etf;

mod traits;

pub use traits::HistoricalPriceProvider;
