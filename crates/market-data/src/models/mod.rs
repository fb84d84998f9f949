//! Market data models
//!
//! - `bar` - A single daily OHLCV bar
//! - `series` - Ordered, validated price series and return derivation

mod bar;
mod series;

pub use bar::Bar;
pub use series::{simple_returns, PriceSeries};
