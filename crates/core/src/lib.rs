//! Quantfolio Core - quantitative risk calculators.
//!
//! Four independent calculators, each a pure function of its input and
//! configuration:
//!
//! - [`risk::RiskScorer`] - composite 0-100 risk score and level
//! - [`portfolio::analysis::PortfolioRiskAnalyzer`] - volatility, VaR, Sharpe,
//!   beta and diversification from holdings
//! - [`simulation::MonteCarloSimulator`] - jump-diffusion and factor-model paths
//! - [`backtest::BacktestEngine`] - rule-based strategies over daily bars
//!
//! Randomness is always injected as `&mut impl Rng`; see [`utils::rng`].

pub mod backtest;
pub mod config;
pub mod constants;
pub mod errors;
pub mod portfolio;
pub mod risk;
pub mod simulation;
pub mod utils;

pub use config::QuantConfig;
pub use portfolio::holdings::{AssetType, Holding};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
