//! Bar data validation.
//!
//! Validates daily bars before they reach any calculator:
//! - Finite, non-negative prices
//! - OHLC invariants (high >= low, open/close between high/low)
//! - Volume sanity

use log::warn;

use crate::errors::MarketDataError;
use crate::models::{Bar, PriceSeries};

/// Validation severity levels.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationSeverity {
    /// Hard failure - reject the bar.
    Hard,
    /// Soft warning - accept the bar but log a warning.
    Soft,
}

/// A single problem found on a bar.
#[derive(Clone, Debug)]
pub struct ValidationIssue {
    pub severity: ValidationSeverity,
    pub message: String,
}

/// Bar validator configuration.
#[derive(Clone, Debug)]
pub struct ValidatorConfig {
    /// Whether to reject bars with negative prices.
    pub reject_negative_prices: bool,
    /// Whether to reject bars where high < low.
    pub reject_invalid_ohlc: bool,
    /// Maximum allowed price value (sanity check).
    pub max_price: Option<f64>,
    /// Whether to warn on zero volume.
    pub warn_on_zero_volume: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            reject_negative_prices: true,
            reject_invalid_ohlc: true,
            max_price: Some(1_000_000_000.0),
            warn_on_zero_volume: false,
        }
    }
}

/// Bar data validator.
#[derive(Clone, Debug, Default)]
pub struct BarValidator {
    config: ValidatorConfig,
}

impl BarValidator {
    /// Create a new validator with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with custom configuration.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate a bar.
    ///
    /// Returns Ok(()) if the bar is valid. Soft issues are logged, not returned.
    pub fn validate(&self, bar: &Bar) -> Result<(), MarketDataError> {
        let mut issues: Vec<ValidationIssue> = Vec::new();

        self.validate_finite(bar, &mut issues);
        self.validate_prices(bar, &mut issues);
        self.validate_ohlc_invariants(bar, &mut issues);
        self.validate_volume(bar, &mut issues);

        let errors: Vec<&str> = issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Hard)
            .map(|i| i.message.as_str())
            .collect();

        if !errors.is_empty() {
            return Err(MarketDataError::ValidationFailed {
                date: bar.date,
                message: errors.join("; "),
            });
        }

        for issue in issues.iter().filter(|i| i.severity == ValidationSeverity::Soft) {
            warn!("Bar validation warning for {}: {}", bar.date, issue.message);
        }

        Ok(())
    }

    /// Validate every bar of a series, stopping at the first hard failure.
    pub fn validate_series(&self, series: &PriceSeries) -> Result<(), MarketDataError> {
        series.bars().iter().try_for_each(|bar| self.validate(bar))
    }

    fn validate_finite(&self, bar: &Bar, issues: &mut Vec<ValidationIssue>) {
        let fields = [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
            ("volume", bar.volume),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                issues.push(ValidationIssue {
                    severity: ValidationSeverity::Hard,
                    message: format!("Non-finite {}: {}", name, value),
                });
            }
        }
    }

    fn validate_prices(&self, bar: &Bar, issues: &mut Vec<ValidationIssue>) {
        if self.config.reject_negative_prices {
            for (name, value) in [("open", bar.open), ("high", bar.high), ("low", bar.low), ("close", bar.close)] {
                if value < 0.0 {
                    issues.push(ValidationIssue {
                        severity: ValidationSeverity::Hard,
                        message: format!("Negative {} price: {}", name, value),
                    });
                }
            }
        }

        if let Some(max) = self.config.max_price {
            if bar.high > max {
                issues.push(ValidationIssue {
                    severity: ValidationSeverity::Hard,
                    message: format!("Price {} exceeds maximum {}", bar.high, max),
                });
            }
        }
    }

    /// - High must be >= Low
    /// - Open and Close should lie between Low and High
    fn validate_ohlc_invariants(&self, bar: &Bar, issues: &mut Vec<ValidationIssue>) {
        if !self.config.reject_invalid_ohlc {
            return;
        }

        if bar.high < bar.low {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Hard,
                message: format!("High ({}) is less than Low ({})", bar.high, bar.low),
            });
            return;
        }

        if bar.open < bar.low || bar.open > bar.high {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Soft,
                message: format!(
                    "Open ({}) is outside High/Low range ({}-{})",
                    bar.open, bar.low, bar.high
                ),
            });
        }

        if bar.close < bar.low || bar.close > bar.high {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Soft,
                message: format!(
                    "Close ({}) is outside High/Low range ({}-{})",
                    bar.close, bar.low, bar.high
                ),
            });
        }
    }

    fn validate_volume(&self, bar: &Bar, issues: &mut Vec<ValidationIssue>) {
        if bar.volume < 0.0 {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Hard,
                message: format!("Negative volume: {}", bar.volume),
            });
        } else if self.config.warn_on_zero_volume && bar.volume == 0.0 {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Soft,
                message: "Zero volume".to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[test]
    fn test_valid_bar() {
        let validator = BarValidator::new();
        let bar = Bar::new(date(), 100.0, 105.0, 95.0, 102.0, 1000.0);
        assert!(validator.validate(&bar).is_ok());
    }

    #[test]
    fn test_high_below_low_is_rejected() {
        let validator = BarValidator::new();
        let bar = Bar::new(date(), 100.0, 95.0, 105.0, 100.0, 1000.0);
        let err = validator.validate(&bar).unwrap_err();
        assert!(err.to_string().contains("High (95) is less than Low (105)"));
    }

    #[test]
    fn test_negative_close_is_rejected() {
        let validator = BarValidator::new();
        let bar = Bar::new(date(), 1.0, 1.0, -1.0, -1.0, 0.0);
        assert!(validator.validate(&bar).is_err());
    }

    #[test]
    fn test_nan_is_rejected() {
        let validator = BarValidator::new();
        let bar = Bar::new(date(), 1.0, 1.0, 1.0, f64::NAN, 0.0);
        assert!(validator.validate(&bar).is_err());
    }

    #[test]
    fn test_close_outside_range_is_soft() {
        let validator = BarValidator::new();
        let bar = Bar::new(date(), 100.0, 105.0, 95.0, 110.0, 1000.0);
        assert!(validator.validate(&bar).is_ok());
    }

    #[test]
    fn test_lenient_config_skips_ohlc() {
        let validator = BarValidator::with_config(ValidatorConfig {
            reject_invalid_ohlc: false,
            ..Default::default()
        });
        let bar = Bar::new(date(), 100.0, 95.0, 105.0, 100.0, 1000.0);
        assert!(validator.validate(&bar).is_ok());
    }

    #[test]
    fn test_validate_series() {
        let validator = BarValidator::new();
        let series = PriceSeries::from_closes("XYZ", date(), &[1.0, 2.0, 3.0]);
        assert!(validator.validate_series(&series).is_ok());
    }
}
