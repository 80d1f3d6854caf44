//! Frankfurter provider for FX historical rates.
//!
//! Fetches daily currency-pair rate tables from the free Frankfurter API
//! (ECB reference rates). No API key is required.
//!
//! # API Endpoints
//!
//! - Timeseries: `https://api.frankfurter.app/{start}..{end}?from={base}&to={quote}`
//!
//! # Response Format
//!
//! ```json
//! {
//!   "base": "EUR",
//!   "rates": { "2022-01-03": { "USD": 1.1301 }, "2022-01-04": { "USD": 1.1279 } }
//! }
//! ```
//!
//! Rates exist for ECB business days only; weekends and holidays are absent
//! and left to the caller's carry-forward policy.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::{PricePoint, ProviderInstrument, ProviderKind};
use crate::provider::HistoricalPriceProvider;

const BASE_URL: &str = "https://api.frankfurter.app";
const PROVIDER_ID: &str = "FRANKFURTER";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Response from the timeseries endpoint.
#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    /// Base currency of the series
    #[allow(dead_code)]
    base: String,
    /// date -> (quote currency -> rate)
    rates: BTreeMap<NaiveDate, HashMap<String, f64>>,
}

/// Frankfurter provider for FX daily rate series.
pub struct FrankfurterProvider {
    client: Client,
}

impl FrankfurterProvider {
    /// Create a new Frankfurter provider.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Extract base and quote currencies, rejecting non-FX instruments.
    fn extract_pair(instrument: &ProviderInstrument) -> Result<(String, String), MarketDataError> {
        match instrument {
            ProviderInstrument::FxPair { base, quote } => Ok((base.clone(), quote.clone())),
            other => Err(MarketDataError::UnsupportedInstrument {
                provider: PROVIDER_ID.to_string(),
                detail: format!("expected FX pair, got: {:?}", other),
            }),
        }
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoricalPriceProvider for FrankfurterProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        3
    }

    fn supports(&self, kind: ProviderKind) -> bool {
        kind == ProviderKind::Fx
    }

    async fn fetch_history(
        &self,
        instrument: &ProviderInstrument,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, MarketDataError> {
        let (base, quote) = Self::extract_pair(instrument)?;

        let url = format!(
            "{}/{}..{}?from={}&to={}",
            BASE_URL,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            base,
            quote
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            // Frankfurter answers 404 for unknown currency codes
            return Err(MarketDataError::SymbolNotFound(format!(
                "{}/{}",
                base, quote
            )));
        }

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !response.status().is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP error: {}", response.status()),
            });
        }

        let timeseries: TimeseriesResponse =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Failed to parse timeseries: {}", e),
                })?;

        debug!(
            "Frankfurter {}/{}: {} business days",
            base,
            quote,
            timeseries.rates.len()
        );

        let mut points = Vec::with_capacity(timeseries.rates.len());
        for (date, rates) in timeseries.rates {
            let Some(rate) = rates.get(&quote) else {
                continue;
            };
            let close = Decimal::from_f64(*rate).ok_or_else(|| {
                MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Invalid rate for {}: {}", date, rate),
                }
            })?;
            points.push(PricePoint::new(date, close));
        }

        // BTreeMap iteration already yields ascending dates
        Ok(points)
    }
}
