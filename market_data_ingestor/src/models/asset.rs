use serde::{Deserialize, Serialize};

/// Asset class of a symbol, used to route requests to the right vendor endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    UsEquity,
    Crypto,
}

impl AssetClass {
    /// Pairs written as `BASE/QUOTE` (e.g. `BTC/USD`) are crypto; everything
    /// else is treated as a US equity ticker.
    pub fn infer(symbol: &str) -> Self {
        if symbol.contains('/') {
            Self::Crypto
        } else {
            Self::UsEquity
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_from_symbol_shape() {
        assert_eq!(AssetClass::infer("BTC/USD"), AssetClass::Crypto);
        assert_eq!(AssetClass::infer("AAPL"), AssetClass::UsEquity);
    }
}
