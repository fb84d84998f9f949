//! Calculator configuration.
//!
//! One struct holds the defaults and thresholds of every calculator. Callers
//! build it (or deserialize it), check it with [`QuantConfig::validate`], and
//! hand each section to the matching calculator. Nothing is read from the
//! environment.

use serde::{Deserialize, Serialize};

use crate::backtest::BacktestConfig;
use crate::errors::{Error, Result};
use crate::portfolio::analysis::AnalyzerConfig;
use crate::risk::RiskScorerConfig;
use crate::simulation::SimulationConfig;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuantConfig {
    pub risk: RiskScorerConfig,
    pub analyzer: AnalyzerConfig,
    pub simulation: SimulationConfig,
    pub backtest: BacktestConfig,
}

impl QuantConfig {
    /// Parses a JSON document. Missing sections and fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: QuantConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects values no calculator can work with.
    pub fn validate(&self) -> Result<()> {
        self.validate_risk()?;
        self.validate_analyzer()?;
        self.validate_simulation()?;
        self.validate_backtest()
    }

    fn validate_risk(&self) -> Result<()> {
        let risk = &self.risk;
        let w = &risk.weights;
        for (name, value) in [
            ("risk.weights.market", w.market),
            ("risk.weights.credit", w.credit),
            ("risk.weights.liquidity", w.liquidity),
            ("risk.weights.sentiment", w.sentiment),
            ("risk.weights.systemic", w.systemic),
        ] {
            non_negative(name, value)?;
        }
        if (w.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(invalid(format!("risk.weights must sum to 1, got {}", w.sum())));
        }

        finite("risk.defaultBeta", risk.default_beta)?;
        non_negative("risk.defaultVolatility", risk.default_volatility)?;
        positive("risk.defaultAverageVolume", risk.default_average_volume)?;
        non_negative("risk.defaultBidAskSpread", risk.default_bid_ask_spread)?;
        finite("risk.defaultCorrelation", risk.default_correlation)?;
        probability("risk.defaultContagion", risk.default_contagion)?;
        non_negative("risk.defaultSentimentScore", risk.default_sentiment_score)?;
        non_negative("risk.stressLossMultiplier", risk.stress_loss_multiplier)?;
        for scenario in &risk.stress_scenarios {
            finite(&format!("risk.stressScenarios.{}", scenario.name), scenario.shock)?;
        }
        Ok(())
    }

    fn validate_analyzer(&self) -> Result<()> {
        let a = &self.analyzer;
        finite("analyzer.riskFreeRate", a.risk_free_rate)?;
        positive("analyzer.marketVolatility", a.market_volatility)?;
        for (name, value) in [
            ("analyzer.wellDiversifiedMaxHhi", a.well_diversified_max_hhi),
            ("analyzer.concentratedHhi", a.concentrated_hhi),
            ("analyzer.maxEquityWeight", a.max_equity_weight),
            ("analyzer.minFixedIncomeWeight", a.min_fixed_income_weight),
            ("analyzer.maxSinglePositionWeight", a.max_single_position_weight),
            ("analyzer.maxSectorWeight", a.max_sector_weight),
            ("analyzer.maxCryptoWeight", a.max_crypto_weight),
            ("analyzer.maxCashWeight", a.max_cash_weight),
        ] {
            probability(name, value)?;
        }
        non_negative("analyzer.wellDiversifiedMinEffective", a.well_diversified_min_effective)?;
        non_negative("analyzer.highVolatility", a.high_volatility)?;
        non_negative("analyzer.lowVolatility", a.low_volatility)?;
        finite("analyzer.strongSharpe", a.strong_sharpe)
    }

    fn validate_simulation(&self) -> Result<()> {
        let s = &self.simulation;
        probability("simulation.confidenceLevel", s.confidence_level)?;
        probability("simulation.jumpProbability", s.jump_probability)?;
        finite("simulation.jumpMean", s.jump_mean)?;
        non_negative("simulation.jumpStdDev", s.jump_std_dev)?;
        positive("simulation.defaultCurrentValue", s.default_current_value)?;
        positive("simulation.defaultExpectedReturn", s.default_expected_return)?;
        positive("simulation.defaultVolatility", s.default_volatility)?;
        if s.default_horizon_days == 0 {
            return Err(invalid("simulation.defaultHorizonDays must be at least 1"));
        }
        if s.default_num_simulations == 0 {
            return Err(invalid("simulation.defaultNumSimulations must be at least 1"));
        }
        Ok(())
    }

    fn validate_backtest(&self) -> Result<()> {
        let b = &self.backtest;
        finite("backtest.riskFreeRate", b.risk_free_rate)?;
        if b.synthetic.days == 0 {
            return Err(invalid("backtest.synthetic.days must be at least 1"));
        }
        positive("backtest.synthetic.startPrice", b.synthetic.start_price)?;
        finite("backtest.synthetic.dailyDrift", b.synthetic.daily_drift)?;
        non_negative("backtest.synthetic.dailyVolatility", b.synthetic.daily_volatility)?;
        non_negative("backtest.synthetic.baseVolume", b.synthetic.base_volume)
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidConfigValue(message.into())
}

fn finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{} must be a finite number, got {}", name, value)))
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(invalid(format!("{} must be non-negative, got {}", name, value)));
    }
    Ok(())
}

fn positive(name: &str, value: f64) -> Result<()> {
    finite(name, value)?;
    if value <= 0.0 {
        return Err(invalid(format!("{} must be positive, got {}", name, value)));
    }
    Ok(())
}

fn probability(name: &str, value: f64) -> Result<()> {
    finite(name, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(format!("{} must be within [0, 1], got {}", name, value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(QuantConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "simulation": { "jumpsEnabled": false, "maxRetainedPaths": 10 },
            "backtest": { "riskFreeRate": 0.03 }
        }"#;
        let config = QuantConfig::from_json_str(json).unwrap();
        assert!(!config.simulation.jumps_enabled);
        assert_eq!(config.simulation.max_retained_paths, 10);
        assert_eq!(config.simulation.confidence_level, 0.95);
        assert_eq!(config.backtest.risk_free_rate, 0.03);
        assert_eq!(config.risk, RiskScorerConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = QuantConfig::default();
        let json = config.to_json_string().unwrap();
        assert_eq!(QuantConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = QuantConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::ConfigIO(_)));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut config = QuantConfig::default();
        config.risk.weights.market = 0.5;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue(ref m) if m.contains("sum to 1")));
    }

    #[test]
    fn test_probabilities_must_be_in_range() {
        let mut config = QuantConfig::default();
        config.simulation.confidence_level = 1.5;
        assert!(config.validate().is_err());

        let mut config = QuantConfig::default();
        config.simulation.jump_probability = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_periods_must_be_positive() {
        let mut config = QuantConfig::default();
        config.simulation.default_horizon_days = 0;
        assert!(config.validate().is_err());

        let mut config = QuantConfig::default();
        config.backtest.synthetic.days = 0;
        assert!(config.validate().is_err());
    }
}
