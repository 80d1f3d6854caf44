//! Built-in asset catalog.
//!
//! A small in-memory repository covering the asset classes the engine
//! supports out of the box. Metal spot prices are proxied through ETF
//! closes with a fixed unit multiplier (GLD tracks 1/10 oz of gold).

use async_trait::async_trait;

use dcasim_market_data::{ProviderInstrument, ProviderKind};
use rust_decimal_macros::dec;

use crate::errors::Result;
use crate::pricing::ResolutionError;

use super::model::Asset;
use super::traits::AssetRepositoryTrait;

/// Asset repository backed by a fixed in-memory catalog.
pub struct InMemoryAssetRepository {
    assets: Vec<Asset>,
}

impl InMemoryAssetRepository {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self { assets }
    }

    /// The built-in catalog.
    pub fn with_defaults() -> Self {
        let assets = vec![
            Asset::new(
                "BTC",
                "Bitcoin",
                ProviderKind::Crypto,
                ProviderInstrument::CryptoPair {
                    symbol: "BTCUSDT".to_string(),
                },
            ),
            Asset::new(
                "ETH",
                "Ethereum",
                ProviderKind::Crypto,
                ProviderInstrument::CryptoPair {
                    symbol: "ETHUSDT".to_string(),
                },
            ),
            Asset::new(
                "SOL",
                "Solana",
                ProviderKind::Crypto,
                ProviderInstrument::CryptoPair {
                    symbol: "SOLUSDT".to_string(),
                },
            ),
            Asset::new(
                "EURUSD",
                "Euro / US Dollar",
                ProviderKind::Fx,
                ProviderInstrument::FxPair {
                    base: "EUR".to_string(),
                    quote: "USD".to_string(),
                },
            ),
            Asset::new(
                "USDTRY",
                "US Dollar / Turkish Lira",
                ProviderKind::Fx,
                ProviderInstrument::FxPair {
                    base: "USD".to_string(),
                    quote: "TRY".to_string(),
                },
            ),
            Asset::new(
                "XAU",
                "Gold (oz)",
                ProviderKind::Metal,
                ProviderInstrument::MetalProxy {
                    proxy_symbol: "GLD".to_string(),
                    unit_multiplier: dec!(10),
                },
            ),
            Asset::new(
                "XAG",
                "Silver (oz)",
                ProviderKind::Metal,
                ProviderInstrument::MetalProxy {
                    proxy_symbol: "SLV".to_string(),
                    unit_multiplier: dec!(1),
                },
            ),
            Asset::new(
                "AAPL",
                "Apple Inc.",
                ProviderKind::Equity,
                ProviderInstrument::EquitySymbol {
                    symbol: "AAPL".to_string(),
                },
            ),
            Asset::new(
                "SPY",
                "SPDR S&P 500 ETF",
                ProviderKind::Equity,
                ProviderInstrument::EquitySymbol {
                    symbol: "SPY".to_string(),
                },
            ),
        ];
        Self::new(assets)
    }
}

#[async_trait]
impl AssetRepositoryTrait for InMemoryAssetRepository {
    async fn resolve(&self, code: &str) -> Result<Asset> {
        self.assets
            .iter()
            .find(|a| a.code == code)
            .cloned()
            .ok_or_else(|| {
                ResolutionError::UnknownAsset {
                    code: code.to_string(),
                }
                .into()
            })
    }

    async fn list(&self) -> Result<Vec<Asset>> {
        Ok(self.assets.clone())
    }
}
