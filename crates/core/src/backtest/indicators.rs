//! Technical indicators over closing prices.
//!
//! Windowed indicators return one entry per input value, `None` until the
//! window is full.

use crate::constants::EPSILON;
use crate::utils::stats::{mean, sample_std_dev};

/// Simple moving average over a trailing window that includes the current value.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                Some(mean(&values[i + 1 - period..=i]))
            }
        })
        .collect()
}

/// Z-score of each value against its trailing window.
///
/// `None` until the window is full or when the window has no dispersion.
pub fn zscore(values: &[f64], lookback: usize) -> Vec<Option<f64>> {
    if lookback < 2 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < lookback {
                return None;
            }
            let window = &values[i + 1 - lookback..=i];
            let std = sample_std_dev(window);
            if std <= EPSILON {
                None
            } else {
                Some((values[i] - mean(window)) / std)
            }
        })
        .collect()
}

/// Exponential moving average, `k = 2 / (period + 1)`, seeded with the first value.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = match values.first() {
        Some(&v) => v,
        None => return out,
    };
    out.push(prev);
    for &value in &values[1..] {
        prev = value * k + prev * (1.0 - k);
        out.push(prev);
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd(values: &[f64], fast: usize, slow: usize, signal_period: usize) -> Macd {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);
    let line: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let signal = ema(&line, signal_period);
    let histogram = line.iter().zip(&signal).map(|(m, s)| m - s).collect();
    Macd {
        macd: line,
        signal,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_window() {
        let out = sma(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(out, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
        assert_eq!(sma(&[1.0], 3), vec![None]);
    }

    #[test]
    fn test_zscore() {
        let out = zscore(&[1.0, 2.0, 3.0], 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        // mean 2, sample std 1
        assert!((out[2].unwrap() - 1.0).abs() < 1e-12);

        // Flat window has no z-score
        assert_eq!(zscore(&[5.0, 5.0, 5.0], 3)[2], None);
    }

    #[test]
    fn test_ema_seeded_with_first_value() {
        let out = ema(&[10.0, 20.0, 20.0], 3);
        // k = 0.5
        assert_eq!(out, vec![10.0, 15.0, 17.5]);
        assert!(ema(&[], 3).is_empty());
    }

    #[test]
    fn test_macd_is_zero_for_flat_prices() {
        let result = macd(&[100.0; 40], 12, 26, 9);
        assert!(result.macd.iter().all(|v| v.abs() < 1e-12));
        assert!(result.histogram.iter().all(|v| v.abs() < 1e-12));
        assert_eq!(result.signal.len(), 40);
    }

    #[test]
    fn test_macd_positive_in_uptrend() {
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let result = macd(&prices, 12, 26, 9);
        assert!(*result.macd.last().unwrap() > 0.0);
    }
}
