//! Binance provider for crypto historical prices.
//!
//! Fetches daily OHLCV candles ("klines") from the public Binance REST API.
//! No API key is required for historical candle queries.
//!
//! # API Endpoints
//!
//! - Daily candles: `https://api.binance.com/api/v3/klines?symbol={pair}&interval=1d&startTime={ms}&endTime={ms}&limit=1000`
//!
//! # Response Format
//!
//! Each kline is a heterogeneous JSON array:
//! `[openTime, open, high, low, close, volume, closeTime, ...]`
//! where prices are decimal strings and times are Unix milliseconds.
//! Requests return at most 1000 candles, so long ranges are paginated.

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::{PricePoint, ProviderInstrument, ProviderKind};
use crate::provider::HistoricalPriceProvider;

const BASE_URL: &str = "https://api.binance.com";
const PROVIDER_ID: &str = "BINANCE";

/// Binance caps kline responses at 1000 rows per request.
const MAX_CANDLES_PER_REQUEST: usize = 1000;

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Binance provider for crypto daily close series.
pub struct BinanceProvider {
    client: Client,
}

impl BinanceProvider {
    /// Create a new Binance provider.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Extract the pair symbol, rejecting non-crypto instruments.
    fn extract_pair(instrument: &ProviderInstrument) -> Result<String, MarketDataError> {
        match instrument {
            ProviderInstrument::CryptoPair { symbol } => Ok(symbol.clone()),
            other => Err(MarketDataError::UnsupportedInstrument {
                provider: PROVIDER_ID.to_string(),
                detail: format!("expected crypto pair, got: {:?}", other),
            }),
        }
    }

    /// Fetch one page of klines starting at `start_ms`.
    async fn fetch_page(
        &self,
        pair: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<Vec<Value>>, MarketDataError> {
        let url = format!(
            "{}/api/v3/klines?symbol={}&interval=1d&startTime={}&endTime={}&limit={}",
            BASE_URL, pair, start_ms, end_ms, MAX_CANDLES_PER_REQUEST
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

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if response.status() == reqwest::StatusCode::BAD_REQUEST {
            // Binance answers 400 for unknown pair symbols
            return Err(MarketDataError::SymbolNotFound(pair.to_string()));
        }

        if !response.status().is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP error: {}", response.status()),
            });
        }

        response
            .json::<Vec<Vec<Value>>>()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse klines: {}", e),
            })
    }

    /// Convert one kline row into a price point.
    ///
    /// Index 0 is the open time in Unix milliseconds, index 4 the close
    /// price as a decimal string.
    fn parse_kline(row: &[Value]) -> Result<PricePoint, MarketDataError> {
        let open_time = row
            .first()
            .and_then(Value::as_i64)
            .ok_or_else(|| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "kline missing open time".to_string(),
            })?;

        let close_str = row
            .get(4)
            .and_then(Value::as_str)
            .ok_or_else(|| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "kline missing close price".to_string(),
            })?;

        let close =
            Decimal::from_str(close_str).map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Invalid close price '{}': {}", close_str, e),
            })?;

        let date = Utc
            .timestamp_millis_opt(open_time)
            .single()
            .ok_or_else(|| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Invalid kline timestamp: {}", open_time),
            })?
            .date_naive();

        Ok(PricePoint::new(date, close))
    }
}

impl Default for BinanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoricalPriceProvider for BinanceProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        2
    }

    fn supports(&self, kind: ProviderKind) -> bool {
        kind == ProviderKind::Crypto
    }

    async fn fetch_history(
        &self,
        instrument: &ProviderInstrument,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, MarketDataError> {
        let pair = Self::extract_pair(instrument)?;

        let start_ms = start
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default();
        // End of the last day, inclusive
        let end_ms = end
            .and_hms_opt(23, 59, 59)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default();

        let mut points: Vec<PricePoint> = Vec::new();
        let mut cursor_ms = start_ms;

        loop {
            let page = self.fetch_page(&pair, cursor_ms, end_ms).await?;
            let page_len = page.len();

            debug!(
                "Binance klines page for {}: {} candles from {}",
                pair, page_len, cursor_ms
            );

            let mut last_open_ms = cursor_ms;
            for row in &page {
                let point = Self::parse_kline(row)?;
                if point.date >= start && point.date <= end {
                    points.push(point);
                }
                if let Some(t) = row.first().and_then(Value::as_i64) {
                    last_open_ms = t;
                }
            }

            if page_len < MAX_CANDLES_PER_REQUEST {
                break;
            }
            cursor_ms = last_open_ms + MILLIS_PER_DAY;
            if cursor_ms > end_ms {
                break;
            }
        }

        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_kline_row() {
        // 2022-01-01T00:00:00Z
        let row = vec![
            json!(1640995200000_i64),
            json!("46200.01000000"),
            json!("47954.63000000"),
            json!("46200.00000000"),
            json!("47722.65000000"),
            json!("19604.46325000"),
        ];
        let point = BinanceProvider::parse_kline(&row).unwrap();
        assert_eq!(point.date, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert_eq!(point.close, dec!(47722.65));
    }

    #[test]
    fn test_parse_kline_rejects_missing_close() {
        let row = vec![json!(1640995200000_i64)];
        let err = BinanceProvider::parse_kline(&row).unwrap_err();
        assert!(matches!(err, MarketDataError::ProviderError { .. }));
    }

    #[test]
    fn test_extract_pair_rejects_fx() {
        let instrument = ProviderInstrument::FxPair {
            base: "EUR".to_string(),
            quote: "USD".to_string(),
        };
        let err = BinanceProvider::extract_pair(&instrument).unwrap_err();
        assert!(matches!(err, MarketDataError::UnsupportedInstrument { .. }));
    }

    #[test]
    fn test_supports_only_crypto() {
        let provider = BinanceProvider::new();
        assert!(provider.supports(ProviderKind::Crypto));
        assert!(!provider.supports(ProviderKind::Fx));
        assert!(!provider.supports(ProviderKind::Equity));
    }
}
