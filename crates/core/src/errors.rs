//! Core error types for the Quantfolio calculators.
//!
//! Calculators are pure, so errors only ever describe bad input or an
//! impossible calculation. Nothing here is retryable.

use std::num::ParseFloatError;
use thiserror::Error;

use quantfolio_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the calculators.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Calculation failed: {0}")]
    Calculation(#[from] CalculatorError),

    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

/// Errors raised while running a calculator over otherwise valid input.
#[derive(Error, Debug, PartialEq)]
pub enum CalculatorError {
    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Calculation failed: {0}")]
    Calculation(String),
}

/// Validation errors for caller-supplied input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to parse number: {0}")]
    NumberParse(#[from] ParseFloatError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),
}

impl Error {
    /// Shorthand for `Error::Validation(ValidationError::InvalidInput(..))`.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::Validation(ValidationError::InvalidInput(message.into()))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigIO(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err: Error = CalculatorError::UnknownStrategy("scalping".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Calculation failed: Unknown strategy: scalping"
        );

        let err = Error::invalid_input("quantity must be non-negative");
        assert_eq!(
            err.to_string(),
            "Input validation failed: Invalid input: quantity must be non-negative"
        );

        let err: Error = CalculatorError::InsufficientData {
            required: 2,
            actual: 1,
        }
        .into();
        assert!(err.to_string().contains("need at least 2 observations, got 1"));
    }

    #[test]
    fn test_parse_float_error_converts() {
        let parse_err = "abc".parse::<f64>().unwrap_err();
        let err: Error = ValidationError::from(parse_err).into();
        assert!(matches!(err, Error::Validation(ValidationError::NumberParse(_))));
    }

    #[test]
    fn test_error_into_string() {
        let message: String = Error::InvalidConfigValue("weights".to_string()).into();
        assert_eq!(message, "Invalid configuration value: weights");
    }
}
