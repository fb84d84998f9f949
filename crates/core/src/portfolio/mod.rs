//! Portfolio module - holdings and portfolio-level analysis.

pub mod analysis;
pub mod holdings;
