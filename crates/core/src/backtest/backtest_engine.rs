//! Backtest engine.
//!
//! Replays a daily series through a strategy's FLAT/LONG state machine.
//! Buys invest all cash in whole shares; sells liquidate the whole position.
//! A position still open after the last bar is marked to market, not closed.

use std::borrow::Cow;

use chrono::NaiveDate;
use log::{debug, warn};
use quantfolio_market_data::{simple_returns, BarValidator, PriceSeries, SyntheticSeriesGenerator};
use rand::Rng;

use super::backtest_model::{
    BacktestConfig, BacktestMetrics, BacktestResult, PortfolioValue, PositionState,
    StrategyParams, Trade, TradeAction,
};
use super::strategies::{Strategy, StrategyKind};
use crate::constants::TRADING_DAYS_PER_YEAR;
use crate::errors::Result;
use crate::utils::stats::{annualize_volatility, max_drawdown, mean, safe_div, sample_std_dev};

const SYNTHETIC_SYMBOL: &str = "SYNTHETIC";

#[derive(Debug, Clone, Default)]
pub struct BacktestEngine {
    config: BacktestConfig,
}

impl BacktestEngine {
    pub fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Runs `strategy_name` over `series`.
    ///
    /// An unknown strategy name or invalid parameters are errors. An empty
    /// series is replaced by a synthetic one drawn from `rng`; `rng` is not
    /// used otherwise.
    pub fn run<R: Rng + ?Sized>(
        &self,
        series: &PriceSeries,
        strategy_name: &str,
        params: &StrategyParams,
        rng: &mut R,
    ) -> Result<BacktestResult> {
        let kind: StrategyKind = strategy_name.parse()?;
        params.validate()?;

        let (series, used_synthetic_data) = if series.is_empty() {
            warn!(
                "Empty price series for '{}'; backtesting {} on synthetic data",
                series.symbol, kind
            );
            let symbol = if series.symbol.trim().is_empty() {
                SYNTHETIC_SYMBOL
            } else {
                series.symbol.as_str()
            };
            let generated =
                SyntheticSeriesGenerator::new(self.config.synthetic.clone()).generate(symbol, rng);
            (Cow::Owned(generated), true)
        } else {
            (Cow::Borrowed(series), false)
        };

        if self.config.validate_bars {
            BarValidator::new().validate_series(&series)?;
        }

        let (trades, portfolio_values) = replay(kind, &series, params);
        let metrics = compute_metrics(
            &trades,
            &portfolio_values,
            params.initial_capital,
            self.config.risk_free_rate,
        );

        debug!(
            "Backtest {} on {}: {} trades, total return {:.4}, final value {:.2}",
            kind,
            series.symbol,
            metrics.total_trades,
            metrics.total_return,
            metrics.final_value
        );

        Ok(BacktestResult {
            strategy: kind,
            symbol: series.symbol.clone(),
            trades,
            portfolio_values,
            metrics,
            used_synthetic_data,
        })
    }

    /// Runs over the bars dated within `[start, end]` only.
    ///
    /// A range with no bars is `MarketDataError::NoDataForRange`; the synthetic
    /// fallback applies only to a series that was empty to begin with.
    pub fn run_between<R: Rng + ?Sized>(
        &self,
        series: &PriceSeries,
        start: NaiveDate,
        end: NaiveDate,
        strategy_name: &str,
        params: &StrategyParams,
        rng: &mut R,
    ) -> Result<BacktestResult> {
        if series.is_empty() {
            return self.run(series, strategy_name, params, rng);
        }
        let window = series.between(start, end)?;
        self.run(&window, strategy_name, params, rng)
    }
}

fn replay(
    kind: StrategyKind,
    series: &PriceSeries,
    params: &StrategyParams,
) -> (Vec<Trade>, Vec<PortfolioValue>) {
    let bars = series.bars();
    let strategy = Strategy::prepare(kind, bars, params);

    let mut cash = params.initial_capital;
    let mut shares: u64 = 0;
    let mut position = PositionState::Flat;
    let mut trades = Vec::new();
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        if let Some(action) = strategy.signal(i, bar, position) {
            let price = strategy.execution_price(i, bar);
            match action {
                TradeAction::Buy => {
                    let quantity = if price > 0.0 {
                        (cash / price).floor() as u64
                    } else {
                        0
                    };
                    if quantity > 0 {
                        cash -= quantity as f64 * price;
                        shares = quantity;
                        position = PositionState::Long;
                        trades.push(Trade {
                            date: bar.date,
                            action,
                            price,
                            shares: quantity,
                        });
                    } else {
                        debug!("Skipping buy on {}: cash {:.2} below price {:.2}", bar.date, cash, price);
                    }
                }
                TradeAction::Sell => {
                    cash += shares as f64 * price;
                    trades.push(Trade {
                        date: bar.date,
                        action,
                        price,
                        shares,
                    });
                    shares = 0;
                    position = PositionState::Flat;
                }
            }
        }

        values.push(PortfolioValue {
            date: bar.date,
            value: cash + shares as f64 * bar.close,
        });
    }

    (trades, values)
}

pub(crate) fn compute_metrics(
    trades: &[Trade],
    values: &[PortfolioValue],
    initial_capital: f64,
    risk_free_rate: f64,
) -> BacktestMetrics {
    let equity: Vec<f64> = values.iter().map(|v| v.value).collect();
    let final_value = equity.last().copied().unwrap_or(initial_capital);
    let total_return = safe_div(final_value - initial_capital, initial_capital);

    let annualized_return = if equity.is_empty() {
        0.0
    } else if 1.0 + total_return <= 0.0 {
        -1.0
    } else {
        (1.0 + total_return).powf(TRADING_DAYS_PER_YEAR / equity.len() as f64) - 1.0
    };

    let daily_returns = simple_returns(&equity);
    let daily_rf = risk_free_rate / TRADING_DAYS_PER_YEAR;
    let excess: Vec<f64> = daily_returns.iter().map(|r| r - daily_rf).collect();
    let sharpe_ratio =
        safe_div(mean(&excess), sample_std_dev(&excess)) * TRADING_DAYS_PER_YEAR.sqrt();

    BacktestMetrics {
        total_return,
        annualized_return,
        sharpe_ratio,
        max_drawdown: max_drawdown(&equity),
        volatility: annualize_volatility(sample_std_dev(&daily_returns)),
        total_trades: trades.len(),
        win_rate: win_rate(trades),
        final_value,
    }
}

/// Share of matched BUY -> SELL pairs closed above entry. A trailing BUY is
/// not counted.
pub(crate) fn win_rate(trades: &[Trade]) -> f64 {
    let mut open: Option<f64> = None;
    let mut pairs = 0usize;
    let mut wins = 0usize;
    for trade in trades {
        match trade.action {
            TradeAction::Buy => open = Some(trade.price),
            TradeAction::Sell => {
                if let Some(entry) = open.take() {
                    pairs += 1;
                    if trade.price > entry {
                        wins += 1;
                    }
                }
            }
        }
    }
    if pairs == 0 {
        0.0
    } else {
        wins as f64 / pairs as f64
    }
}
