//! Fixed-shape numeric views of the newest enriched rows.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::indicators::EnrichedBar;

/// Offset applied to the close for the stop-loss/take-profit hints in prompts.
pub const LEVEL_OFFSET: f64 = 0.01;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("no enriched rows for {symbol}")]
pub struct EmptyDataError {
    pub symbol: String,
}

/// Latest indicator readings for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub rsi: f64,
    pub macd: f64,
    pub signal: f64,
    pub sma_20: f64,
    pub sma_50: f64,
}

impl Snapshot {
    fn from_row(row: &EnrichedBar, symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            timestamp: row.bar.timestamp,
            close: row.bar.close,
            rsi: row.rsi,
            macd: row.macd,
            signal: row.signal,
            sma_20: row.sma_20,
            sma_50: row.sma_50,
        }
    }

    /// Stop-loss hint for a long entry at the current close.
    pub fn suggested_stop_loss(&self) -> f64 {
        self.close * (1.0 - LEVEL_OFFSET)
    }

    /// Take-profit hint for a long entry at the current close.
    pub fn suggested_take_profit(&self) -> f64 {
        self.close * (1.0 + LEVEL_OFFSET)
    }

    /// Stop-loss hint for a short entry: the long take-profit level.
    pub fn short_stop_loss(&self) -> f64 {
        self.suggested_take_profit()
    }

    pub fn short_take_profit(&self) -> f64 {
        self.suggested_stop_loss()
    }
}

/// The last two snapshots, used to ask whether the trend just flipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSnapshot {
    pub previous: Snapshot,
    pub current: Snapshot,
}

/// Snapshot of the newest enriched row.
pub fn build_snapshot(enriched: &[EnrichedBar], symbol: &str) -> Result<Snapshot, EmptyDataError> {
    enriched
        .last()
        .map(|row| Snapshot::from_row(row, symbol))
        .ok_or_else(|| EmptyDataError {
            symbol: symbol.to_string(),
        })
}

/// Needs at least two enriched rows.
pub fn build_trend_snapshot(
    enriched: &[EnrichedBar],
    symbol: &str,
) -> Result<TrendSnapshot, EmptyDataError> {
    match enriched {
        [.., previous, current] => Ok(TrendSnapshot {
            previous: Snapshot::from_row(previous, symbol),
            current: Snapshot::from_row(current, symbol),
        }),
        _ => Err(EmptyDataError {
            symbol: symbol.to_string(),
        }),
    }
}
