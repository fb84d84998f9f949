//! Quantfolio Market Data Crate
//!
//! Daily price data for the Quantfolio calculators.
//!
//! # Overview
//!
//! - [`Bar`] - one daily OHLCV record
//! - [`PriceSeries`] - strictly date-ordered bars with derived returns
//! - [`BarValidator`] - OHLC and sanity checks before data reaches a calculator
//! - [`SyntheticSeriesGenerator`] - seedable random-walk series for demos and fallbacks
//!
//! Fetching data from providers is the caller's concern; this crate only models
//! and checks what it is handed.

pub mod calendar;
pub mod errors;
pub mod models;
pub mod synthetic;
pub mod validator;

pub use errors::MarketDataError;
pub use models::{simple_returns, Bar, PriceSeries};
pub use synthetic::{SyntheticSeriesConfig, SyntheticSeriesGenerator};
pub use validator::{BarValidator, ValidationIssue, ValidationSeverity, ValidatorConfig};
