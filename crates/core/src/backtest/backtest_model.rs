use chrono::NaiveDate;
use quantfolio_market_data::SyntheticSeriesConfig;
use serde::{Deserialize, Serialize};

use super::strategies::StrategyKind;
use crate::constants::{DEFAULT_RISK_FREE_RATE, DISPLAY_DECIMAL_PRECISION};
use crate::errors::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

/// Position state shared by every strategy. At most one position is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionState {
    Flat,
    Long,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub date: NaiveDate,
    pub action: TradeAction,
    pub price: f64,
    pub shares: u64,
}

impl Trade {
    pub fn value(&self) -> f64 {
        self.price * self.shares as f64
    }
}

/// Mark-to-market equity at a bar's close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValue {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestMetrics {
    pub total_return: f64,
    pub annualized_return: f64,
    pub sharpe_ratio: f64,
    /// Positive fraction
    pub max_drawdown: f64,
    /// Annualized volatility of daily equity returns
    pub volatility: f64,
    pub total_trades: usize,
    /// Share of matched BUY/SELL pairs that closed above the entry. 0 with no pairs.
    pub win_rate: f64,
    pub final_value: f64,
}

/// Display strings for [`BacktestMetrics`], percentages as "12.34%".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedMetrics {
    pub total_return: String,
    pub annualized_return: String,
    pub sharpe_ratio: String,
    pub max_drawdown: String,
    pub volatility: String,
    pub total_trades: String,
    pub win_rate: String,
    pub final_value: String,
}

impl BacktestMetrics {
    pub fn formatted(&self) -> FormattedMetrics {
        FormattedMetrics {
            total_return: format_percent(self.total_return),
            annualized_return: format_percent(self.annualized_return),
            sharpe_ratio: format_number(self.sharpe_ratio),
            max_drawdown: format_percent(self.max_drawdown),
            volatility: format_percent(self.volatility),
            total_trades: self.total_trades.to_string(),
            win_rate: format_percent(self.win_rate),
            final_value: format_number(self.final_value),
        }
    }
}

fn format_number(value: f64) -> String {
    // Avoid "-0.00"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.*}", DISPLAY_DECIMAL_PRECISION, value)
}

fn format_percent(fraction: f64) -> String {
    format!("{}%", format_number(fraction * 100.0))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestResult {
    pub strategy: StrategyKind,
    pub symbol: String,
    pub trades: Vec<Trade>,
    pub portfolio_values: Vec<PortfolioValue>,
    pub metrics: BacktestMetrics,
    /// Set when the input series was empty and a synthetic one was generated
    pub used_synthetic_data: bool,
}

/// Strategy parameters. Unused fields are ignored by strategies that do not need them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrategyParams {
    /// Moving average window for momentum (default: 20)
    pub ma_period: usize,
    /// Z-score window for mean reversion (default: 20)
    pub lookback: usize,
    /// Z-score entry threshold (default: 2.0)
    pub z_score_threshold: f64,
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
    /// Starting cash (default: 10,000)
    pub initial_capital: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            ma_period: 20,
            lookback: 20,
            z_score_threshold: 2.0,
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
            initial_capital: 10_000.0,
        }
    }
}

impl StrategyParams {
    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("maPeriod", self.ma_period),
            ("lookback", self.lookback),
            ("fastPeriod", self.fast_period),
            ("slowPeriod", self.slow_period),
            ("signalPeriod", self.signal_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(Error::invalid_input(format!("{} must be at least 1", name)));
        }
        if self.fast_period >= self.slow_period {
            return Err(Error::invalid_input(format!(
                "fastPeriod ({}) must be shorter than slowPeriod ({})",
                self.fast_period, self.slow_period
            )));
        }
        if !self.z_score_threshold.is_finite() || self.z_score_threshold < 0.0 {
            return Err(Error::invalid_input(format!(
                "zScoreThreshold must be a non-negative number, got {}",
                self.z_score_threshold
            )));
        }
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(Error::invalid_input(format!(
                "initialCapital must be positive, got {}",
                self.initial_capital
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BacktestConfig {
    /// Annual risk-free rate used by the Sharpe ratio (default: 0.02)
    pub risk_free_rate: f64,
    /// Series generated when the caller supplies no bars
    pub synthetic: SyntheticSeriesConfig,
    /// Run bar sanity checks before replaying (default: true)
    pub validate_bars: bool,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            synthetic: SyntheticSeriesConfig::default(),
            validate_bars: true,
        }
    }
}
