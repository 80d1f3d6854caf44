use serde::{Deserialize, Serialize};

use dcasim_market_data::{ProviderInstrument, ProviderKind};

/// Asset class, reused from the market-data crate so the core never has to
/// translate between two kind enums.
pub type AssetKind = ProviderKind;

/// A simulatable asset.
///
/// `code` is the stable user-facing identifier ("BTC", "EURUSD", "AAPL").
/// `instrument` tells the market-data layer how to fetch history for it; an
/// asset without one can be listed but never simulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub code: String,
    pub name: String,
    pub kind: AssetKind,
    pub instrument: Option<ProviderInstrument>,
}

impl Asset {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        kind: AssetKind,
        instrument: ProviderInstrument,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            kind,
            instrument: Some(instrument),
        }
    }
}
