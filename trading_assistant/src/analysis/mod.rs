//! Typed results decoded from the engine's raw answers.

mod parser;
mod vocabulary;

pub use parser::{SchemaError, parse_analysis, parse_trend};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Direction of an order or of a trend change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl Recommendation {
    /// `None` for HOLD.
    pub fn side(self) -> Option<TradeSide> {
        match self {
            Recommendation::Buy => Some(TradeSide::Buy),
            Recommendation::Sell => Some(TradeSide::Sell),
            Recommendation::Hold => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub recommendation: Recommendation,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    pub reasoning: String,
    pub risk_level: RiskLevel,
    pub suggested_stop_loss: f64,
    pub suggested_take_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend_change: bool,
    /// Present exactly when `trend_change` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<TradeSide>,
    pub reasoning: String,
}
