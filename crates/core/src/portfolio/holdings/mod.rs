//! Holdings module - the position record every calculator consumes.

mod holdings_model;

pub use holdings_model::{
    normalize_holdings, total_market_value, value_weights, AssetType, Holding,
};
