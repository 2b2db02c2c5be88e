//! Broker boundary: submit an [`OrderIntent`], get an [`ExecutionReport`].

pub mod alpaca;
pub mod paper;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decision::OrderIntent;

pub use alpaca::{AlpacaOrderExecutor, TradingEnvironment};
pub use paper::PaperExecutor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub success: bool,
    pub broker_order_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("broker rejected the order ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("broker request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("order intent is not submittable: {0}")]
    InvalidIntent(String),

    #[error("could not set up broker client: {0}")]
    Setup(String),
}

#[async_trait]
pub trait OrderExecutor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn submit(&self, intent: &OrderIntent) -> Result<ExecutionReport, ExecutionError>;
}

/// Checks shared by every executor: positive finite volume and levels, with
/// stop-loss and take-profit on the correct sides for the order direction.
pub fn validate_intent(intent: &OrderIntent) -> Result<(), ExecutionError> {
    use crate::analysis::TradeSide;

    if !(intent.volume.is_finite() && intent.volume > 0.0) {
        return Err(ExecutionError::InvalidIntent(format!(
            "volume must be positive, got {}",
            intent.volume
        )));
    }
    for (field, value) in [("stop_loss", intent.stop_loss), ("take_profit", intent.take_profit)] {
        if !(value.is_finite() && value > 0.0) {
            return Err(ExecutionError::InvalidIntent(format!(
                "{field} must be a positive price, got {value}"
            )));
        }
    }
    let oriented = match intent.side {
        TradeSide::Buy => intent.stop_loss < intent.take_profit,
        TradeSide::Sell => intent.stop_loss > intent.take_profit,
    };
    if !oriented {
        return Err(ExecutionError::InvalidIntent(format!(
            "{:?} order needs stop_loss {} take_profit (got {} / {})",
            intent.side,
            if intent.side == TradeSide::Buy { "below" } else { "above" },
            intent.stop_loss,
            intent.take_profit
        )));
    }
    Ok(())
}
