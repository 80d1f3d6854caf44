//! Metal provider backed by ETF proxy price series.
//!
//! Precious-metal spot history is not freely available at daily resolution,
//! so metals are priced through liquid ETF proxies (e.g. XAU through GLD,
//! XAG through SLV). The proxy's daily close is scaled by a fixed unit
//! multiplier carried on the instrument to approximate the metal unit price.
//!
//! The actual candle fetch is delegated to an inner equity-capable backend;
//! this module only translates the instrument and scales the series.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use std::sync::Arc;

use crate::errors::MarketDataError;
use crate::models::{PricePoint, ProviderInstrument, ProviderKind};
use crate::provider::HistoricalPriceProvider;

const PROVIDER_ID: &str = "METAL_ETF";

/// Metal price backend delegating to an equity provider via ETF proxies.
pub struct MetalEtfProxyProvider {
    inner: Arc<dyn HistoricalPriceProvider>,
}

impl MetalEtfProxyProvider {
    /// Create a new metal proxy provider on top of an equity backend.
    pub fn new(inner: Arc<dyn HistoricalPriceProvider>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl HistoricalPriceProvider for MetalEtfProxyProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        4
    }

    fn supports(&self, kind: ProviderKind) -> bool {
        kind == ProviderKind::Metal
    }

    async fn fetch_history(
        &self,
        instrument: &ProviderInstrument,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, MarketDataError> {
        let (proxy_symbol, unit_multiplier) = match instrument {
            ProviderInstrument::MetalProxy {
                proxy_symbol,
                unit_multiplier,
            } => (proxy_symbol.clone(), *unit_multiplier),
            other => {
                return Err(MarketDataError::UnsupportedInstrument {
                    provider: PROVIDER_ID.to_string(),
                    detail: format!("expected metal proxy, got: {:?}", other),
                })
            }
        };

        let proxy_instrument = ProviderInstrument::EquitySymbol {
            symbol: proxy_symbol.clone(),
        };
        let mut points = self
            .inner
            .fetch_history(&proxy_instrument, start, end)
            .await?;

        for point in &mut points {
            point.close *= unit_multiplier;
        }

        debug!(
            "Metal proxy {} x{}: {} candles via {}",
            proxy_symbol,
            unit_multiplier,
            points.len(),
            self.inner.id()
        );
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct FixedEquityProvider;

    #[async_trait]
    impl HistoricalPriceProvider for FixedEquityProvider {
        fn id(&self) -> &'static str {
            "FIXED"
        }

        fn supports(&self, kind: ProviderKind) -> bool {
            kind == ProviderKind::Equity
        }

        async fn fetch_history(
            &self,
            instrument: &ProviderInstrument,
            start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<PricePoint>, MarketDataError> {
            assert!(matches!(
                instrument,
                ProviderInstrument::EquitySymbol { symbol } if symbol == "GLD"
            ));
            Ok(vec![PricePoint::new(start, dec!(185.50))])
        }
    }

    #[tokio::test]
    async fn test_proxy_scales_closes_by_multiplier() {
        let provider = MetalEtfProxyProvider::new(Arc::new(FixedEquityProvider));
        let instrument = ProviderInstrument::MetalProxy {
            proxy_symbol: "GLD".to_string(),
            unit_multiplier: dec!(10),
        };
        let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        let end = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();

        let points = provider.fetch_history(&instrument, start, end).await.unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].close, dec!(1855.00));
    }

    #[tokio::test]
    async fn test_proxy_rejects_equity_instrument() {
        let provider = MetalEtfProxyProvider::new(Arc::new(FixedEquityProvider));
        let instrument = ProviderInstrument::EquitySymbol {
            symbol: "GLD".to_string(),
        };
        let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        let err = provider
            .fetch_history(&instrument, start, start)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketDataError::UnsupportedInstrument { .. }));
    }
}
