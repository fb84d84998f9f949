use serde::{Deserialize, Serialize};

use crate::constants::TRADING_DAYS_PER_YEAR;

/// Starting point of a single-asset simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParams {
    pub current_value: f64,
    /// Expected annual return, e.g. 0.08
    pub expected_return: f64,
    /// Annualized volatility, e.g. 0.15
    pub volatility: f64,
}

impl SimulationParams {
    pub fn new(current_value: f64, expected_return: f64, volatility: f64) -> Self {
        Self {
            current_value,
            expected_return,
            volatility,
        }
    }
}

/// Simulator settings and the defaults substituted for degenerate input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    /// Two-sided confidence interval level (default: 0.95)
    pub confidence_level: f64,
    /// Maximum number of full paths returned in the result (default: 100)
    pub max_retained_paths: usize,

    /// Enables Merton-style jump shocks (default: true)
    pub jumps_enabled: bool,
    /// Daily jump probability (default: 0.01)
    pub jump_probability: f64,
    /// Mean jump size (default: -0.02)
    pub jump_mean: f64,
    /// Jump size standard deviation (default: 0.05)
    pub jump_std_dev: f64,

    pub default_current_value: f64,
    pub default_expected_return: f64,
    pub default_volatility: f64,
    pub default_horizon_days: usize,
    pub default_num_simulations: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            max_retained_paths: 100,
            jumps_enabled: true,
            jump_probability: 0.01,
            jump_mean: -0.02,
            jump_std_dev: 0.05,
            default_current_value: 1_000_000.0,
            default_expected_return: 0.08,
            default_volatility: 0.15,
            default_horizon_days: TRADING_DAYS_PER_YEAR as usize,
            default_num_simulations: 1_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceInterval {
    pub level: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Cross-sectional percentiles of path values on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileBand {
    pub day: usize,
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub initial_value: f64,
    pub horizon_days: usize,
    pub num_simulations: usize,

    /// Mean final value
    pub expected_value: f64,
    pub median_value: f64,
    /// Final value at the 5th percentile
    pub var_95: f64,
    /// Mean final value of the worst 5% of paths
    pub cvar_95: f64,
    /// `initial_value - var_95`
    pub var_95_loss: f64,
    /// `initial_value - cvar_95`, never below `var_95_loss`
    pub cvar_95_loss: f64,
    /// Largest peak-to-trough decline seen on any path
    pub max_drawdown: f64,
    /// Share of paths that end below the initial value
    pub probability_of_loss: f64,
    pub confidence_interval: ConfidenceInterval,

    /// One band per day, day 0 included
    pub percentile_bands: Vec<PercentileBand>,
    /// The first `max_retained_paths` simulated paths
    pub paths: Vec<Vec<f64>>,
}

/// Named risk factors of the factor model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Factor {
    Market,
    Size,
    Value,
    Momentum,
    Quality,
    Volatility,
}

impl Factor {
    pub const ALL: [Factor; 6] = [
        Factor::Market,
        Factor::Size,
        Factor::Value,
        Factor::Momentum,
        Factor::Quality,
        Factor::Volatility,
    ];

    /// Default annual premium.
    pub fn default_annual_mean(&self) -> f64 {
        match self {
            Factor::Market => 0.07,
            Factor::Size => 0.02,
            Factor::Value => 0.03,
            Factor::Momentum => 0.04,
            Factor::Quality => 0.03,
            Factor::Volatility => -0.01,
        }
    }

    /// Default annualized factor volatility.
    pub fn default_annual_volatility(&self) -> f64 {
        match self {
            Factor::Market => 0.16,
            Factor::Size => 0.10,
            Factor::Value => 0.10,
            Factor::Momentum => 0.14,
            Factor::Quality => 0.08,
            Factor::Volatility => 0.12,
        }
    }
}

/// Portfolio loading on one factor. Mean and volatility fall back to the
/// factor defaults when absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorExposure {
    pub factor: Factor,
    pub loading: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_volatility: Option<f64>,
}

impl FactorExposure {
    pub fn new(factor: Factor, loading: f64) -> Self {
        Self {
            factor,
            loading,
            annual_mean: None,
            annual_volatility: None,
        }
    }

    pub fn mean(&self) -> f64 {
        self.annual_mean.unwrap_or_else(|| self.factor.default_annual_mean())
    }

    pub fn volatility(&self) -> f64 {
        self.annual_volatility
            .unwrap_or_else(|| self.factor.default_annual_volatility())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorModelParams {
    pub current_value: f64,
    pub exposures: Vec<FactorExposure>,
    /// Share of variance explained by the factors, in [0, 1]
    pub r_squared: f64,
    /// Annualized total volatility of the portfolio before factor attribution
    pub residual_volatility: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorContribution {
    pub factor: Factor,
    pub loading: f64,
    /// `loading * annual mean`
    pub expected_return: f64,
    /// Share of total model variance from this factor
    pub risk_contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorSimulationResult {
    pub simulation: SimulationResult,
    pub contributions: Vec<FactorContribution>,
    /// Annualized idiosyncratic volatility actually used
    pub idiosyncratic_volatility: f64,
    /// Share of total model variance that is idiosyncratic
    pub idiosyncratic_risk_share: f64,
    pub expected_annual_return: f64,
    pub annual_volatility: f64,
}
