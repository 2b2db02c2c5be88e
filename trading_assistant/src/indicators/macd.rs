//! Moving Average Convergence Divergence (MACD) and its signal line.
//!
//! MACD = EMA(fast) - EMA(slow); Signal = EMA(signal) of the MACD series.
//! The recurrences run from the first close, but MACD is only reported from
//! index `slow - 1` and Signal from index `slow + signal - 2`, once both
//! averages have seen a full span of history.

use crate::indicators::ema::ema;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
}

pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdLines {
    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);
    let raw_macd: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();
    let raw_signal = ema(&raw_macd, signal);

    let macd_start = slow.saturating_sub(1);
    let signal_start = (slow + signal).saturating_sub(2);

    MacdLines {
        macd: mask_before(&raw_macd, macd_start),
        signal: mask_before(&raw_signal, signal_start),
    }
}

fn mask_before(values: &[f64], start: usize) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i >= start).then_some(v))
        .collect()
}
