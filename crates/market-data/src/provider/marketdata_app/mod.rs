//! MarketData.app provider for equity historical prices.
//!
//! Fetches daily candles from the MarketData.app API with Bearer token
//! authentication.
//!
//! # API Endpoints
//!
//! - Historical candles: `https://api.marketdata.app/v1/stocks/candles/D/{symbol}/?from={start}&to={end}`
//!
//! # Response Format
//!
//! The API returns parallel arrays for OHLCV data with a status field `s`
//! indicating success ("ok"), "no_data", or an error.

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use log::debug;
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::{PricePoint, ProviderInstrument, ProviderKind};
use crate::provider::HistoricalPriceProvider;

const BASE_URL: &str = "https://api.marketdata.app/v1";
const PROVIDER_ID: &str = "MARKETDATA_APP";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Response from the candles endpoint for historical data.
#[derive(Debug, Deserialize)]
struct CandlesResponse {
    /// Status: "ok", "no_data", or error message
    s: String,
    /// Close prices
    #[serde(default)]
    c: Option<Vec<f64>>,
    /// Unix timestamps (seconds)
    #[serde(default)]
    t: Option<Vec<i64>>,
}

/// MarketData.app provider for equity daily close series.
///
/// # Example
///
/// ```ignore
/// let provider = MarketDataAppProvider::new("your-api-key".to_string());
/// let points = provider.fetch_history(&instrument, start, end).await?;
/// ```
pub struct MarketDataAppProvider {
    client: Client,
    api_key: String,
}

impl MarketDataAppProvider {
    /// Create a new MarketData.app provider with the given API key.
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_key }
    }

    /// Extract the ticker, rejecting non-equity instruments.
    fn extract_symbol(instrument: &ProviderInstrument) -> Result<String, MarketDataError> {
        match instrument {
            ProviderInstrument::EquitySymbol { symbol } => Ok(symbol.clone()),
            other => Err(MarketDataError::UnsupportedInstrument {
                provider: PROVIDER_ID.to_string(),
                detail: format!("expected equity symbol, got: {:?}", other),
            }),
        }
    }

    /// Turn the parallel-array candle payload into price points.
    fn parse_candles(
        symbol: &str,
        response: CandlesResponse,
    ) -> Result<Vec<PricePoint>, MarketDataError> {
        if response.s == "no_data" {
            return Ok(Vec::new());
        }
        if response.s != "ok" {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Candles status for {}: {}", symbol, response.s),
            });
        }

        let closes = response.c.unwrap_or_default();
        let timestamps = response.t.unwrap_or_default();
        if closes.len() != timestamps.len() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!(
                    "Mismatched candle arrays for {}: {} closes, {} timestamps",
                    symbol,
                    closes.len(),
                    timestamps.len()
                ),
            });
        }

        let mut points = Vec::with_capacity(closes.len());
        for (ts, close) in timestamps.into_iter().zip(closes) {
            let date = Utc
                .timestamp_opt(ts, 0)
                .single()
                .ok_or_else(|| MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Invalid candle timestamp: {}", ts),
                })?
                .date_naive();
            let close = Decimal::from_f64(close).ok_or_else(|| {
                MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Invalid close for {} at {}: {}", symbol, date, close),
                }
            })?;
            points.push(PricePoint::new(date, close));
        }

        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Ok(points)
    }
}

#[async_trait]
impl HistoricalPriceProvider for MarketDataAppProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        2
    }

    fn supports(&self, kind: ProviderKind) -> bool {
        kind == ProviderKind::Equity
    }

    async fn fetch_history(
        &self,
        instrument: &ProviderInstrument,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, MarketDataError> {
        let symbol = Self::extract_symbol(instrument)?;

        let url = format!(
            "{}/stocks/candles/D/{}/?from={}&to={}",
            BASE_URL,
            symbol,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
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

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MarketDataError::SymbolNotFound(symbol));
        }

        if !response.status().is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP error: {}", response.status()),
            });
        }

        let candles: CandlesResponse =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Failed to parse candles: {}", e),
                })?;

        let points = Self::parse_candles(&symbol, candles)?;
        debug!("MarketData.app {}: {} candles", symbol, points.len());
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_candles_ok() {
        let response = CandlesResponse {
            s: "ok".to_string(),
            // 2022-01-03 and 2022-01-04, midnight UTC
            c: Some(vec![182.01, 179.70]),
            t: Some(vec![1641168000, 1641254400]),
        };
        let points = MarketDataAppProvider::parse_candles("AAPL", response).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2022, 1, 3).unwrap());
        assert_eq!(points[0].close, dec!(182.01));
        assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2022, 1, 4).unwrap());
    }

    #[test]
    fn test_parse_candles_no_data_is_empty() {
        let response = CandlesResponse {
            s: "no_data".to_string(),
            c: None,
            t: None,
        };
        let points = MarketDataAppProvider::parse_candles("AAPL", response).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_parse_candles_mismatched_arrays() {
        let response = CandlesResponse {
            s: "ok".to_string(),
            c: Some(vec![182.01]),
            t: Some(vec![1641168000, 1641254400]),
        };
        let err = MarketDataAppProvider::parse_candles("AAPL", response).unwrap_err();
        assert!(matches!(err, MarketDataError::ProviderError { .. }));
    }

    #[test]
    fn test_supports_only_equity() {
        let provider = MarketDataAppProvider::new("key".to_string());
        assert!(provider.supports(ProviderKind::Equity));
        assert!(!provider.supports(ProviderKind::Metal));
    }
}
