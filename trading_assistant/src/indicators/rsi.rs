//! Relative Strength Index (RSI), simple-average variant.
//!
//! Average gain and average loss are trailing simple means of the last
//! `period` close-to-close changes (not Wilder smoothing).
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! First defined value at index `period` (needs `period + 1` closes).
//! Edge case: avg_loss == 0 → RSI = 100.

pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = closes.len();
    let mut out = vec![None; n];
    if period == 0 || n < period + 1 {
        return out;
    }

    // deltas[i] is the change into bar i + 1
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    for (i, window) in (period..).zip(deltas.windows(period)) {
        let (gain_sum, loss_sum) = window.iter().fold((0.0, 0.0), |(g, l), &d| {
            if d > 0.0 { (g + d, l) } else { (g, l - d) }
        });
        out[i] = Some(compute_rsi(
            gain_sum / period as f64,
            loss_sum / period as f64,
        ));
    }
    out
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn rsi_all_gains() {
        let out = rsi(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0], 3);
        assert_eq!(out[2], None);
        assert_approx(out[3].unwrap(), 100.0, 1e-9);
        assert_approx(out[5].unwrap(), 100.0, 1e-9);
    }

    #[test]
    fn rsi_all_losses() {
        let out = rsi(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0], 3);
        assert_approx(out[3].unwrap(), 0.0, 1e-9);
    }

    #[test]
    fn rsi_flat_prices_count_as_no_loss() {
        let out = rsi(&[50.0; 20], 14);
        assert_approx(out[14].unwrap(), 100.0, 1e-9);
        assert_approx(out[19].unwrap(), 100.0, 1e-9);
    }

    #[test]
    fn rsi_mixed() {
        // Changes: +0.34, -0.25, -0.48, +0.72
        // window at index 3: gains 0.34, losses 0.73 → RSI = 100 - 100/(1 + 0.34/0.73)
        let out = rsi(&[44.0, 44.34, 44.09, 43.61, 44.33], 3);
        assert_eq!(out[0..3], [None, None, None]);
        let expected = 100.0 - 100.0 / (1.0 + 0.34 / 0.73);
        assert_approx(out[3].unwrap(), expected, 1e-9);

        // window at index 4 drops the +0.34: gains 0.72, losses 0.73
        let expected = 100.0 - 100.0 / (1.0 + 0.72 / 0.73);
        assert_approx(out[4].unwrap(), expected, 1e-9);
    }

    #[test]
    fn rsi_needs_period_plus_one_closes() {
        assert!(rsi(&[1.0; 14], 14).iter().all(Option::is_none));
        assert!(rsi(&[1.0; 15], 14)[14].is_some());
    }
}
