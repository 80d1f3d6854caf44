//! Provider registry routing instruments to backends.
//!
//! The registry holds one or more backends and selects, per instrument
//! kind, the supporting backend with the best (lowest) priority. It carries
//! none of the fetch orchestration itself; the simulation core drives
//! concurrency and decides what an empty series means.

use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;

use crate::errors::MarketDataError;
use crate::models::{PricePoint, ProviderInstrument, ProviderKind};
use crate::provider::HistoricalPriceProvider;

/// Registry of historical price backends.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn HistoricalPriceProvider>>,
}

impl ProviderRegistry {
    /// Create a registry from a set of backends.
    ///
    /// Providers are sorted by ascending priority once at construction.
    pub fn new(mut providers: Vec<Arc<dyn HistoricalPriceProvider>>) -> Self {
        providers.sort_by_key(|p| p.priority());
        Self { providers }
    }

    /// Select the backend for an instrument kind.
    pub fn provider_for(
        &self,
        kind: ProviderKind,
    ) -> Result<Arc<dyn HistoricalPriceProvider>, MarketDataError> {
        self.providers
            .iter()
            .find(|p| p.supports(kind))
            .cloned()
            .ok_or_else(|| MarketDataError::NoProviderForKind {
                kind: kind.to_string(),
            })
    }

    /// Fetch the daily close series for an instrument through the backend
    /// matching its kind.
    pub async fn fetch_history(
        &self,
        instrument: &ProviderInstrument,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, MarketDataError> {
        let provider = self.provider_for(instrument.kind())?;
        debug!(
            "Routing {:?} [{} .. {}] to {}",
            instrument.kind(),
            start,
            end,
            provider.id()
        );
        provider.fetch_history(instrument, start, end).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    struct StubProvider {
        id: &'static str,
        kind: ProviderKind,
        priority: u8,
    }

    #[async_trait]
    impl HistoricalPriceProvider for StubProvider {
        fn id(&self) -> &'static str {
            self.id
        }

        fn priority(&self) -> u8 {
            self.priority
        }

        fn supports(&self, kind: ProviderKind) -> bool {
            kind == self.kind
        }

        async fn fetch_history(
            &self,
            _instrument: &ProviderInstrument,
            start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<PricePoint>, MarketDataError> {
            Ok(vec![PricePoint::new(start, dec!(1))])
        }
    }

    #[test]
    fn test_selects_supporting_provider() {
        let registry = ProviderRegistry::new(vec![
            Arc::new(StubProvider {
                id: "CRYPTO",
                kind: ProviderKind::Crypto,
                priority: 2,
            }),
            Arc::new(StubProvider {
                id: "FX",
                kind: ProviderKind::Fx,
                priority: 3,
            }),
        ]);

        assert_eq!(registry.provider_for(ProviderKind::Fx).unwrap().id(), "FX");
        assert_eq!(
            registry.provider_for(ProviderKind::Crypto).unwrap().id(),
            "CRYPTO"
        );
    }

    #[test]
    fn test_priority_breaks_ties() {
        let registry = ProviderRegistry::new(vec![
            Arc::new(StubProvider {
                id: "SLOW",
                kind: ProviderKind::Equity,
                priority: 9,
            }),
            Arc::new(StubProvider {
                id: "FAST",
                kind: ProviderKind::Equity,
                priority: 1,
            }),
        ]);

        assert_eq!(
            registry.provider_for(ProviderKind::Equity).unwrap().id(),
            "FAST"
        );
    }

    #[test]
    fn test_missing_kind_is_an_error() {
        let registry = ProviderRegistry::new(vec![]);
        let err = registry.provider_for(ProviderKind::Metal).err().unwrap();
        assert!(matches!(err, MarketDataError::NoProviderForKind { .. }));
    }
}
