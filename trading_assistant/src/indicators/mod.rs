//! Technical indicators and the enrichment step that attaches them to bars.
//!
//! [`enrich`] computes SMA(20), SMA(50), RSI(14), MACD(12, 26) and its 9-period
//! signal line over the closes and keeps only the rows where all five are
//! defined and finite.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

use market_data_ingestor::models::bar::Bar;
use serde::Serialize;

pub const SMA_FAST_PERIOD: usize = 20;
pub const SMA_SLOW_PERIOD: usize = 50;
pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST_SPAN: usize = 12;
pub const MACD_SLOW_SPAN: usize = 26;
pub const MACD_SIGNAL_SPAN: usize = 9;

/// Fewest bars that can produce an enriched row. SMA(50) is the binding
/// window: MACD/Signal are defined from bar 34 and RSI from bar 15.
pub const WARMUP_BARS: usize = {
    let macd_ready = MACD_SLOW_SPAN + MACD_SIGNAL_SPAN - 1;
    let rsi_ready = RSI_PERIOD + 1;
    let mut n = SMA_SLOW_PERIOD;
    if macd_ready > n {
        n = macd_ready;
    }
    if rsi_ready > n {
        n = rsi_ready;
    }
    n
};

/// A bar with every indicator present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedBar {
    pub bar: Bar,
    pub sma_20: f64,
    pub sma_50: f64,
    pub rsi: f64,
    pub macd: f64,
    pub signal: f64,
}

/// Attach indicators to a chronological bar series.
///
/// Rows where any indicator is still warming up (or came out non-finite) are
/// dropped, so the output is shorter than the input by at least
/// `WARMUP_BARS - 1` rows. Empty input yields empty output.
pub fn enrich(bars: &[Bar]) -> Vec<EnrichedBar> {
    if bars.is_empty() {
        return Vec::new();
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let sma_20 = sma::sma(&closes, SMA_FAST_PERIOD);
    let sma_50 = sma::sma(&closes, SMA_SLOW_PERIOD);
    let rsi = rsi::rsi(&closes, RSI_PERIOD);
    let lines = macd::macd(&closes, MACD_FAST_SPAN, MACD_SLOW_SPAN, MACD_SIGNAL_SPAN);

    bars.iter()
        .enumerate()
        .filter_map(|(i, bar)| {
            let row = EnrichedBar {
                bar: bar.clone(),
                sma_20: sma_20[i]?,
                sma_50: sma_50[i]?,
                rsi: rsi[i]?,
                macd: lines.macd[i]?,
                signal: lines.signal[i]?,
            };
            row.is_finite().then_some(row)
        })
        .collect()
}

impl EnrichedBar {
    fn is_finite(&self) -> bool {
        [self.sma_20, self.sma_50, self.rsi, self.macd, self.signal]
            .iter()
            .all(|v| v.is_finite())
    }
}

#[cfg(test)]
pub(crate) fn assert_approx(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tol {tol})"
    );
}

#[cfg(test)]
pub(crate) fn make_bars(closes: &[f64]) -> Vec<Bar> {
    use chrono::{Duration, TimeZone, Utc};

    let start = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::new(start + Duration::minutes(i as i64), c, c, c, c, 1.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn linear(n: usize) -> Vec<f64> {
        (0..n).map(|i| 40_000.0 + 10.0 * i as f64).collect()
    }

    #[test]
    fn warmup_is_fifty_bars() {
        assert_eq!(WARMUP_BARS, 50);
        assert!(enrich(&make_bars(&linear(49))).is_empty());
        assert_eq!(enrich(&make_bars(&linear(50))).len(), 1);
    }

    #[test]
    fn empty_input_is_not_an_error() {
        assert!(enrich(&[]).is_empty());
    }

    #[test]
    fn rows_keep_chronological_order() {
        let bars = make_bars(&linear(60));
        let rows = enrich(&bars);
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0].bar.timestamp, bars[49].timestamp);
        assert!(rows.windows(2).all(|w| w[0].bar.timestamp < w[1].bar.timestamp));
    }

    #[test]
    fn linear_uptrend_reads_bullish() {
        // 40000, 40010, ..., 40590
        let rows = enrich(&make_bars(&linear(60)));
        let last = rows.last().unwrap();
        assert_eq!(last.bar.close, 40_590.0);
        assert!(last.rsi > 50.0);
        assert!(last.macd > last.signal);
        assert_approx(last.sma_20, 40_495.0, 1e-9);
        assert_approx(last.sma_50, 40_345.0, 1e-9);
    }

    proptest! {
        #[test]
        fn short_series_never_enrich(closes in prop::collection::vec(1.0f64..1e6, 0..WARMUP_BARS)) {
            prop_assert!(enrich(&make_bars(&closes)).is_empty());
        }

        #[test]
        fn rsi_stays_in_bounds(closes in prop::collection::vec(1.0f64..1e6, WARMUP_BARS..120)) {
            for row in enrich(&make_bars(&closes)) {
                prop_assert!((0.0..=100.0).contains(&row.rsi), "rsi {}", row.rsi);
            }
        }

        #[test]
        fn enrichment_is_deterministic(closes in prop::collection::vec(1.0f64..1e6, WARMUP_BARS..120)) {
            let bars = make_bars(&closes);
            let first = enrich(&bars);
            let second = enrich(&bars);
            prop_assert_eq!(first.len(), second.len());
            for (a, b) in first.iter().zip(&second) {
                prop_assert_eq!(a.rsi.to_bits(), b.rsi.to_bits());
                prop_assert_eq!(a.macd.to_bits(), b.macd.to_bits());
                prop_assert_eq!(a.signal.to_bits(), b.signal.to_bits());
                prop_assert_eq!(a.sma_20.to_bits(), b.sma_20.to_bits());
                prop_assert_eq!(a.sma_50.to_bits(), b.sma_50.to_bits());
            }
        }
    }
}
