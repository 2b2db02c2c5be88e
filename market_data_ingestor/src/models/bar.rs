//! Canonical in-memory representation of a time-series bar (OHLCV).
//!
//! This struct is the standard output of every
//! [`MarketDataSource`](crate::providers::MarketDataSource) implementation,
//! regardless of vendor or asset class.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single time-series bar (OHLCV) for a given timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// The timestamp for this bar (UTC).
    pub timestamp: DateTime<Utc>,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Volume traded during the bar interval. Zero when the vendor has none
    /// (e.g. forex pairs on TwelveData).
    pub volume: f64,

    /// Trade count for the bar. Not all providers supply this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_count: Option<u64>,

    /// Volume-weighted average price. Not all providers supply this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vwap: Option<f64>,
}

impl Bar {
    /// Plain OHLCV bar without the optional vendor extras.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            trade_count: None,
            vwap: None,
        }
    }

    fn has_finite_prices(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Bring a vendor series into canonical shape: chronological order, one bar
/// per timestamp (the last one seen wins) and no bars with non-finite prices.
pub fn normalize_bars(mut bars: Vec<Bar>) -> Vec<Bar> {
    bars.retain(Bar::has_finite_prices);
    // stable sort keeps vendor order among equal timestamps, so "last wins" holds
    bars.sort_by_key(|b| b.timestamp);

    let mut out: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(prev) if prev.timestamp == bar.timestamp => *prev = bar,
            _ => out.push(bar),
        }
    }
    out
}
