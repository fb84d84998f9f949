//! Error types for the market data crate.
//!
//! [`MarketDataError`] covers everything that can go wrong while building or
//! validating price series. Generation of synthetic data never fails.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// The series violates an ordering or shape invariant.
    #[error("Invalid price series '{symbol}': {message}")]
    InvalidSeries {
        /// Symbol of the offending series
        symbol: String,
        /// Description of the violated invariant
        message: String,
    },

    /// A bar failed validation checks.
    #[error("Validation failed for bar on {date}: {message}")]
    ValidationFailed {
        /// Date of the rejected bar
        date: NaiveDate,
        /// Description of the validation failure
        message: String,
    },

    /// No bars available for the requested range.
    #[error("No data for date range")]
    NoDataForRange,
}

impl MarketDataError {
    /// Creates an `InvalidSeries` error.
    pub fn invalid_series(symbol: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSeries {
            symbol: symbol.into(),
            message: message.into(),
        }
    }
}
