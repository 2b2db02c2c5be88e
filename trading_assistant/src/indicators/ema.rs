//! Exponential Moving Average (EMA), non-adjusted form.
//!
//! `ema[0] = x[0]`, `ema[t] = α·x[t] + (1 − α)·ema[t − 1]`, `α = 2 / (span + 1)`.
//! Defined from the first sample; callers decide how much of the early series
//! they trust.

pub fn alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let a = alpha(span);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &x in values {
        let next = match prev {
            None => x,
            Some(p) => a * x + (1.0 - a) * p,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn seeded_with_first_value() {
        let out = ema(&[10.0, 11.0, 12.0], 3);
        // alpha = 0.5
        assert_approx(out[0], 10.0, 1e-12);
        assert_approx(out[1], 10.5, 1e-12);
        assert_approx(out[2], 11.25, 1e-12);
    }

    #[test]
    fn constant_series_stays_constant() {
        let out = ema(&[5.0; 30], 12);
        assert!(out.iter().all(|&v| (v - 5.0).abs() < 1e-12));
    }

    #[test]
    fn empty_in_empty_out() {
        assert!(ema(&[], 9).is_empty());
    }
}
