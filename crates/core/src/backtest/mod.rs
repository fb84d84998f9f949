//! Backtesting module - rule-based strategies replayed over daily bars.

mod backtest_engine;
mod backtest_model;
pub mod indicators;
mod strategies;

pub use backtest_engine::BacktestEngine;
pub use backtest_model::{
    BacktestConfig, BacktestMetrics, BacktestResult, FormattedMetrics, PortfolioValue,
    PositionState, StrategyParams, Trade, TradeAction,
};
pub use strategies::StrategyKind;
