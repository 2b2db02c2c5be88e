//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window.
//! First defined value at index `period - 1`.

/// SMA of `values` over `period`; `None` until the window is full.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    // Summed per window, no running total.
    for (end, window) in (period - 1..).zip(values.windows(period)) {
        out[end] = Some(window.iter().sum::<f64>() / period as f64);
    }
    out
}
