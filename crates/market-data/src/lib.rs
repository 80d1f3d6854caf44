//! DCA Simulator Market Data Crate
//!
//! This crate provides provider-agnostic historical price fetching for the
//! DCA simulation engine.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Multiple asset kinds: crypto, FX pairs, precious metals, equities
//! - One backend per kind, swappable behind a single trait
//! - Retry classification so callers can distinguish transient failures
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +--------------------+
//! |  Simulation core | --> | ProviderInstrument |  (resolved asset identity)
//! +------------------+     +--------------------+
//!                                   |
//!                                   v
//!                          +------------------+
//!                          | ProviderRegistry |  (kind -> backend)
//!                          +------------------+
//!                                   |
//!                                   v
//!                          +------------------+
//!                          |     Backend      |  (Binance, Frankfurter, ...)
//!                          +------------------+
//!                                   |
//!                                   v
//!                          +------------------+
//!                          |   PricePoint[]   |  (day-indexed close series)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`ProviderInstrument`] - Provider-specific lookup parameters
//! - [`ProviderKind`] - Classification of price data sources
//! - [`PricePoint`] - One calendar day's closing price
//! - [`HistoricalPriceProvider`] - The backend trait
//! - [`ProviderRegistry`] - Selects a backend for an instrument kind

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

// Re-export all public types from models
pub use models::{PricePoint, ProviderInstrument, ProviderKind};

// Re-export provider types
pub use provider::binance::BinanceProvider;
pub use provider::frankfurter::FrankfurterProvider;
pub use provider::marketdata_app::MarketDataAppProvider;
pub use provider::metal_etf::MetalEtfProxyProvider;
pub use provider::HistoricalPriceProvider;

// Re-export registry types
pub use registry::ProviderRegistry;

// Re-export error types
pub use errors::{MarketDataError, RetryClass};
