//! Trading strategies.
//!
//! Each strategy precomputes its indicators once, then answers per bar whether
//! the FLAT/LONG state machine should transition.

use std::fmt;
use std::str::FromStr;

use quantfolio_market_data::Bar;
use serde::{Deserialize, Serialize};

use super::backtest_model::{PositionState, StrategyParams, TradeAction};
use super::indicators::{macd, sma, zscore};
use crate::errors::{CalculatorError, Error};

const MOMENTUM_ENTRY_BAND: f64 = 1.02;
const MOMENTUM_EXIT_BAND: f64 = 0.98;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyKind {
    BuyAndHold,
    Momentum,
    MeanReversion,
    MacdCrossover,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::BuyAndHold,
        StrategyKind::Momentum,
        StrategyKind::MeanReversion,
        StrategyKind::MacdCrossover,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::BuyAndHold => "buyAndHold",
            StrategyKind::Momentum => "momentum",
            StrategyKind::MeanReversion => "meanReversion",
            StrategyKind::MacdCrossover => "macdCrossover",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    /// Accepts camelCase names plus snake_case and kebab-case spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "buyandhold" => Ok(StrategyKind::BuyAndHold),
            "momentum" => Ok(StrategyKind::Momentum),
            "meanreversion" => Ok(StrategyKind::MeanReversion),
            "macdcrossover" | "macd" => Ok(StrategyKind::MacdCrossover),
            _ => Err(CalculatorError::UnknownStrategy(s.to_string()).into()),
        }
    }
}

/// A strategy bound to one series.
#[derive(Debug, Clone)]
pub(crate) enum Strategy {
    BuyAndHold,
    Momentum {
        moving_average: Vec<Option<f64>>,
    },
    MeanReversion {
        zscores: Vec<Option<f64>>,
        threshold: f64,
    },
    MacdCrossover {
        line: Vec<f64>,
        signal: Vec<f64>,
        /// First bar at which the slow EMA has `slow_period` observations
        first_signal_bar: usize,
    },
}

impl Strategy {
    pub(crate) fn prepare(kind: StrategyKind, bars: &[Bar], params: &StrategyParams) -> Self {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        match kind {
            StrategyKind::BuyAndHold => Strategy::BuyAndHold,
            StrategyKind::Momentum => Strategy::Momentum {
                moving_average: sma(&closes, params.ma_period),
            },
            StrategyKind::MeanReversion => Strategy::MeanReversion {
                zscores: zscore(&closes, params.lookback),
                threshold: params.z_score_threshold,
            },
            StrategyKind::MacdCrossover => {
                let m = macd(
                    &closes,
                    params.fast_period,
                    params.slow_period,
                    params.signal_period,
                );
                Strategy::MacdCrossover {
                    line: m.macd,
                    signal: m.signal,
                    first_signal_bar: params.slow_period.saturating_sub(1).max(1),
                }
            }
        }
    }

    /// Transition for bar `i` given the current position, if any.
    pub(crate) fn signal(&self, i: usize, bar: &Bar, position: PositionState) -> Option<TradeAction> {
        match (self, position) {
            (Strategy::BuyAndHold, PositionState::Flat) if i == 0 => Some(TradeAction::Buy),
            (Strategy::BuyAndHold, _) => None,

            (Strategy::Momentum { moving_average }, _) => {
                let ma = moving_average.get(i).copied().flatten()?;
                match position {
                    PositionState::Flat if bar.close > ma * MOMENTUM_ENTRY_BAND => {
                        Some(TradeAction::Buy)
                    }
                    PositionState::Long if bar.close < ma * MOMENTUM_EXIT_BAND => {
                        Some(TradeAction::Sell)
                    }
                    _ => None,
                }
            }

            (Strategy::MeanReversion { zscores, threshold }, _) => {
                let z = zscores.get(i).copied().flatten()?;
                match position {
                    PositionState::Flat if z < -threshold => Some(TradeAction::Buy),
                    PositionState::Long if z > 0.0 => Some(TradeAction::Sell),
                    _ => None,
                }
            }

            (
                Strategy::MacdCrossover {
                    line,
                    signal,
                    first_signal_bar,
                },
                _,
            ) => {
                if i < *first_signal_bar || i >= line.len() {
                    return None;
                }
                let (prev, curr) = (line[i - 1] - signal[i - 1], line[i] - signal[i]);
                match position {
                    PositionState::Flat if prev <= 0.0 && curr > 0.0 => Some(TradeAction::Buy),
                    PositionState::Long if prev >= 0.0 && curr < 0.0 => Some(TradeAction::Sell),
                    _ => None,
                }
            }
        }
    }

    /// Fill price for a transition on bar `i`. Buy-and-hold enters at the first open.
    pub(crate) fn execution_price(&self, i: usize, bar: &Bar) -> f64 {
        match self {
            Strategy::BuyAndHold if i == 0 => bar.open,
            _ => bar.close,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategy_names() {
        assert_eq!("buyAndHold".parse::<StrategyKind>().unwrap(), StrategyKind::BuyAndHold);
        assert_eq!("buy_and_hold".parse::<StrategyKind>().unwrap(), StrategyKind::BuyAndHold);
        assert_eq!("mean-reversion".parse::<StrategyKind>().unwrap(), StrategyKind::MeanReversion);
        assert_eq!("MACD_CROSSOVER".parse::<StrategyKind>().unwrap(), StrategyKind::MacdCrossover);
        assert_eq!(" momentum ".parse::<StrategyKind>().unwrap(), StrategyKind::Momentum);
    }

    #[test]
    fn test_unknown_strategy() {
        let err = "scalping".parse::<StrategyKind>().unwrap_err();
        assert!(matches!(
            err,
            Error::Calculation(CalculatorError::UnknownStrategy(ref name)) if name == "scalping"
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string().parse::<StrategyKind>().unwrap(), kind);
        }
    }
}
