//! Descriptive statistics shared by the calculators.
//!
//! Every function returns a defined number for empty or degenerate input
//! (usually 0.0) so NaN never leaks into a result record.

use crate::constants::{EPSILON, TRADING_DAYS_PER_YEAR};

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator). Zero for fewer than 2 values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Population standard deviation (n denominator). Zero for empty input.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Annualizes a daily standard deviation by sqrt(252).
pub fn annualize_volatility(daily_std: f64) -> f64 {
    daily_std * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Sample covariance of two equally long series. Zero when misaligned or too short.
pub fn covariance(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.len() < 2 {
        return 0.0;
    }
    let (ma, mb) = (mean(a), mean(b));
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - ma) * (y - mb))
        .sum::<f64>()
        / (a.len() - 1) as f64
}

/// Returns a sorted copy. NaN sorts last under `total_cmp`.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Lower-tail index for probability `p` over `n` sorted observations.
pub fn tail_index(n: usize, p: f64) -> usize {
    if n == 0 {
        return 0;
    }
    ((p * n as f64).floor() as usize).min(n - 1)
}

/// Value at probability `p` of an ascending slice, nearest-rank below.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    sorted[tail_index(sorted.len(), p.clamp(0.0, 1.0))]
}

/// Mean of the worst `p` share of an ascending slice (at least one observation).
pub fn tail_mean_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let count = tail_index(sorted.len(), p).max(1);
    mean(&sorted[..count])
}

/// Largest peak-to-trough decline of a value path, as a positive fraction.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let mut tracker = match values.first() {
        Some(&v) => DrawdownTracker::new(v),
        None => return 0.0,
    };
    for &value in values {
        tracker.push(value);
    }
    tracker.max_drawdown()
}

/// Streaming form of [`max_drawdown`] for paths that are never stored.
#[derive(Debug, Clone, Copy)]
pub struct DrawdownTracker {
    peak: f64,
    max_dd: f64,
}

impl DrawdownTracker {
    pub fn new(first: f64) -> Self {
        Self {
            peak: first,
            max_dd: 0.0,
        }
    }

    pub fn push(&mut self, value: f64) {
        if value > self.peak {
            self.peak = value;
        }
        if self.peak > EPSILON {
            self.max_dd = self.max_dd.max((self.peak - value) / self.peak);
        }
    }

    pub fn max_drawdown(&self) -> f64 {
        self.max_dd
    }
}

/// Herfindahl-Hirschman index of weights, normalized by their sum.
///
/// Zero when there are no positive weights.
pub fn herfindahl(weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if total <= EPSILON {
        return 0.0;
    }
    weights
        .iter()
        .filter(|w| **w > 0.0)
        .map(|w| (w / total).powi(2))
        .sum()
}

/// `numerator / denominator`, or 0.0 when the denominator is effectively zero.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() <= EPSILON || !denominator.is_finite() {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), 5.0);
        assert!((population_std_dev(&values) - 2.0).abs() < 1e-12);
        assert!((sample_std_dev(&values) - 2.138_089_935).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_inputs_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(sample_std_dev(&[1.0]), 0.0);
        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
        assert_eq!(herfindahl(&[]), 0.0);
        assert_eq!(percentile_sorted(&[], 0.05), 0.0);
        assert_eq!(safe_div(1.0, 0.0), 0.0);
    }

    #[test]
    fn test_max_drawdown() {
        let path = [100.0, 120.0, 90.0, 110.0, 60.0, 130.0];
        assert!((max_drawdown(&path) - 0.5).abs() < 1e-12);
        assert_eq!(max_drawdown(&[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_herfindahl() {
        assert!((herfindahl(&[0.5, 0.5]) - 0.5).abs() < 1e-12);
        assert!((herfindahl(&[3.0]) - 1.0).abs() < 1e-12);
        // Unnormalized weights are normalized first
        assert!((herfindahl(&[25.0, 25.0, 25.0, 25.0]) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_tail_statistics() {
        let values: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        let s = sorted(&values);
        assert_eq!(percentile_sorted(&s, 0.05), 6.0);
        assert_eq!(tail_mean_sorted(&s, 0.05), 3.0);
        assert!(tail_mean_sorted(&s, 0.05) <= percentile_sorted(&s, 0.05));
    }

    #[test]
    fn test_covariance() {
        let a = [1.0, 2.0, 3.0];
        let b = [2.0, 4.0, 6.0];
        assert!((covariance(&a, &b) - 2.0).abs() < 1e-12);
        assert_eq!(covariance(&a, &b[..2]), 0.0);
    }
}
