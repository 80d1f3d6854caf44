//! Asset and price-history resolution.
//!
//! Before a run executes, every active allocation is resolved to an asset
//! and its full daily close history for the scenario range is fetched, one
//! concurrent request per asset. Any asset that cannot produce a usable
//! series aborts the whole run.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::try_join_all;
use log::debug;
use thiserror::Error;

use dcasim_market_data::ProviderRegistry;

use crate::assets::AssetRepositoryTrait;
use crate::errors::{Error, Result};

use super::table::PriceTable;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Unknown asset code '{code}'")]
    UnknownAsset { code: String },
    #[error("Asset '{code}' has no provider instrument")]
    MissingProviderIdentifier { code: String },
    #[error("No historical prices available for '{code}' in the requested range")]
    HistoricalDataUnavailable { code: String },
}

/// Resolves asset codes to priced history through the provider registry.
pub struct PriceResolver {
    assets: Arc<dyn AssetRepositoryTrait>,
    registry: Arc<ProviderRegistry>,
}

impl PriceResolver {
    pub fn new(assets: Arc<dyn AssetRepositoryTrait>, registry: Arc<ProviderRegistry>) -> Self {
        Self { assets, registry }
    }

    /// Fetch histories for all codes concurrently and assemble the price
    /// table. Fails on the first unresolvable asset or empty series.
    pub async fn resolve(
        &self,
        codes: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable> {
        let fetches = codes.iter().map(|code| self.fetch_one(code, start, end));
        let series = try_join_all(fetches).await?;

        let mut table = PriceTable::new();
        for (code, points) in series {
            table.insert_series(code, points);
        }
        Ok(table)
    }

    async fn fetch_one(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(String, Vec<dcasim_market_data::PricePoint>)> {
        let asset = self.assets.resolve(code).await?;
        let instrument = asset.instrument.as_ref().ok_or_else(|| {
            Error::from(ResolutionError::MissingProviderIdentifier {
                code: code.to_string(),
            })
        })?;

        let points = self.registry.fetch_history(instrument, start, end).await?;
        if points.is_empty() {
            return Err(ResolutionError::HistoricalDataUnavailable {
                code: code.to_string(),
            }
            .into());
        }
        debug!("Resolved {} price points for {}", points.len(), code);
        Ok((code.to_string(), points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{Asset, InMemoryAssetRepository};
    use async_trait::async_trait;
    use dcasim_market_data::{
        HistoricalPriceProvider, MarketDataError, PricePoint, ProviderInstrument, ProviderKind,
    };
    use rust_decimal_macros::dec;

    struct FixedProvider {
        kind: ProviderKind,
        points: Vec<PricePoint>,
    }

    #[async_trait]
    impl HistoricalPriceProvider for FixedProvider {
        fn id(&self) -> &'static str {
            "FIXED"
        }

        fn supports(&self, kind: ProviderKind) -> bool {
            kind == self.kind
        }

        async fn fetch_history(
            &self,
            _instrument: &ProviderInstrument,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> std::result::Result<Vec<PricePoint>, MarketDataError> {
            Ok(self.points.clone())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn resolver(points: Vec<PricePoint>) -> PriceResolver {
        let assets = Arc::new(InMemoryAssetRepository::with_defaults());
        let registry = Arc::new(ProviderRegistry::new(vec![Arc::new(FixedProvider {
            kind: ProviderKind::Crypto,
            points,
        })]));
        PriceResolver::new(assets, registry)
    }

    #[tokio::test]
    async fn test_resolves_series_into_table() {
        let resolver = resolver(vec![PricePoint::new(date(2023, 1, 2), dec!(20000))]);
        let table = resolver
            .resolve(&["BTC".to_string()], date(2023, 1, 1), date(2023, 2, 1))
            .await
            .unwrap();

        assert!(table.has_series("BTC"));
        assert_eq!(
            table.price_at_or_before("BTC", date(2023, 1, 15)),
            Some(dec!(20000))
        );
    }

    #[tokio::test]
    async fn test_empty_series_aborts_resolution() {
        let resolver = resolver(vec![]);
        let err = resolver
            .resolve(&["BTC".to_string()], date(2023, 1, 1), date(2023, 2, 1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Resolution(ResolutionError::HistoricalDataUnavailable { ref code })
                if code == "BTC"
        ));
    }

    #[tokio::test]
    async fn test_asset_without_instrument_is_rejected() {
        let assets = Arc::new(InMemoryAssetRepository::new(vec![Asset {
            code: "MYSTERY".to_string(),
            name: "No instrument".to_string(),
            kind: ProviderKind::Equity,
            instrument: None,
        }]));
        let registry = Arc::new(ProviderRegistry::new(vec![]));
        let resolver = PriceResolver::new(assets, registry);

        let err = resolver
            .resolve(&["MYSTERY".to_string()], date(2023, 1, 1), date(2023, 2, 1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Resolution(ResolutionError::MissingProviderIdentifier { .. })
        ));
    }
}
