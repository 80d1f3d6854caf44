//! Shared model types for historical price fetching.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of price data sources.
///
/// Each kind maps onto one backend: crypto exchanges serve daily OHLCV
/// candles, FX providers serve currency-pair rate tables, metals are priced
/// through ETF proxies, and equities through daily candle queries.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Crypto exchange OHLCV (e.g. Binance daily klines)
    Crypto,
    /// Foreign-exchange rate tables (e.g. Frankfurter)
    Fx,
    /// Precious metals via ETF-proxy price series
    Metal,
    /// Equities and ETFs via daily candles
    Equity,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Crypto => "Crypto",
            Self::Fx => "Fx",
            Self::Metal => "Metal",
            Self::Equity => "Equity",
        };
        f.write_str(s)
    }
}

/// Provider-specific lookup parameters for one asset.
///
/// Produced by asset resolution in the core crate; consumed by the backend
/// matching the instrument's kind. A tagged enum rather than a trait
/// hierarchy so the whole identity is a plain serializable value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderInstrument {
    /// Exchange trading pair, e.g. "BTCUSDT"
    CryptoPair {
        /// Exchange pair symbol
        symbol: String,
    },
    /// Currency pair quoted as base/quote, e.g. EUR/USD
    FxPair {
        /// Base currency (ISO 4217)
        base: String,
        /// Quote currency (ISO 4217)
        quote: String,
    },
    /// Metal priced through an ETF proxy.
    ///
    /// The proxy's close is multiplied by `unit_multiplier` to recover the
    /// spot-equivalent price (e.g. GLD tracks roughly 1/10 oz of gold, so
    /// the multiplier is 10).
    MetalProxy {
        /// Equity symbol of the proxy ETF, e.g. "GLD"
        proxy_symbol: String,
        /// Fixed scale from proxy share price to metal unit price
        unit_multiplier: Decimal,
    },
    /// Plain equity or ETF ticker, e.g. "AAPL"
    EquitySymbol {
        /// Exchange ticker
        symbol: String,
    },
}

impl ProviderInstrument {
    /// The provider kind this instrument must be routed to.
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::CryptoPair { .. } => ProviderKind::Crypto,
            Self::FxPair { .. } => ProviderKind::Fx,
            Self::MetalProxy { .. } => ProviderKind::Metal,
            Self::EquitySymbol { .. } => ProviderKind::Equity,
        }
    }
}

/// One calendar day's closing price.
///
/// Backends return these ordered by date ascending, at most one per day.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Calendar day the close belongs to (UTC)
    pub date: NaiveDate,
    /// Closing price in the provider's quote currency
    pub close: Decimal,
}

impl PricePoint {
    /// Create a new price point.
    pub fn new(date: NaiveDate, close: Decimal) -> Self {
        Self { date, close }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_instrument_kind_mapping() {
        let crypto = ProviderInstrument::CryptoPair {
            symbol: "BTCUSDT".to_string(),
        };
        assert_eq!(crypto.kind(), ProviderKind::Crypto);

        let fx = ProviderInstrument::FxPair {
            base: "EUR".to_string(),
            quote: "USD".to_string(),
        };
        assert_eq!(fx.kind(), ProviderKind::Fx);

        let metal = ProviderInstrument::MetalProxy {
            proxy_symbol: "GLD".to_string(),
            unit_multiplier: dec!(10),
        };
        assert_eq!(metal.kind(), ProviderKind::Metal);

        let equity = ProviderInstrument::EquitySymbol {
            symbol: "AAPL".to_string(),
        };
        assert_eq!(equity.kind(), ProviderKind::Equity);
    }

    #[test]
    fn test_price_point_new() {
        let date = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let point = PricePoint::new(date, dec!(20000));
        assert_eq!(point.date, date);
        assert_eq!(point.close, dec!(20000));
    }
}
