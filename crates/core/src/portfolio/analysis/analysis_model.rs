use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_RISK_FREE_RATE;
use crate::risk::Priority;

/// Optional market history for the analyzed portfolio.
///
/// Empty vectors mean "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketContext {
    /// Historical portfolio values (NAV), oldest first. Required for max drawdown.
    pub portfolio_value_history: Vec<f64>,
    /// Periodic (daily) portfolio returns
    pub portfolio_returns: Vec<f64>,
    /// Market returns aligned with `portfolio_returns`
    pub market_returns: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VarMethod {
    /// Normal approximation `mean - z * sigma`
    Parametric,
    /// Empirical percentile of observed returns
    Historical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BetaSource {
    /// Value-weighted betas reported on the holdings
    Holdings,
    /// Covariance with supplied market returns
    Regression,
    /// Portfolio volatility over the assumed market volatility
    VolatilityRatio,
    /// Nothing to estimate from (empty portfolio)
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    /// Annualized volatility
    pub volatility: f64,
    /// Mean daily return x 252 when daily returns are supplied, else the
    /// since-purchase portfolio return. Numerator of Sharpe and Treynor.
    pub annualized_return: f64,
    /// Peak-to-trough decline of the supplied value history. `None` without history.
    pub max_drawdown: Option<f64>,
    /// 10-day 95% VaR as a positive fraction of portfolio value
    pub var_95: f64,
    /// 10-day 99% VaR as a positive fraction of portfolio value
    pub var_99: f64,
    pub var_95_amount: f64,
    pub var_99_amount: f64,
    pub var_method: VarMethod,
    pub sharpe_ratio: f64,
    pub treynor_ratio: f64,
    pub beta: f64,
    pub beta_source: BetaSource,
    /// Number of return observations behind the statistics
    pub observations: usize,
}

/// Weight of one allocation bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSlice {
    pub key: String,
    pub value: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiversificationBreakdown {
    pub herfindahl_index: f64,
    pub effective_holdings: f64,
    pub is_well_diversified: bool,
    pub largest_position_weight: f64,
    pub by_asset_type: Vec<AllocationSlice>,
    pub by_sector: Vec<AllocationSlice>,
    pub by_region: Vec<AllocationSlice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsightKind {
    Strength,
    Weakness,
}

/// A rule outcome describing something good or bad about the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioInsight {
    pub kind: InsightKind,
    /// Stable identifier of the rule, e.g. "EQUITY_CONCENTRATION"
    pub code: String,
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundCategory {
    GlobalEquity,
    AggregateBond,
    BroadMarketIndex,
    LowVolatilityEquity,
    DividendIncome,
}

impl FundCategory {
    pub fn label(&self) -> &'static str {
        match self {
            FundCategory::GlobalEquity => "Global equity funds",
            FundCategory::AggregateBond => "Aggregate bond funds",
            FundCategory::BroadMarketIndex => "Broad market index funds",
            FundCategory::LowVolatilityEquity => "Low-volatility equity funds",
            FundCategory::DividendIncome => "Dividend income funds",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundRecommendation {
    pub category: FundCategory,
    pub priority: Priority,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub holdings_count: usize,
    pub total_value: f64,
    pub total_cost: f64,
    pub unrealized_pnl: f64,
    /// Unrealized P&L over cost basis
    pub portfolio_return: f64,
    pub metrics: RiskMetrics,
    pub diversification: DiversificationBreakdown,
    pub strengths: Vec<PortfolioInsight>,
    pub weaknesses: Vec<PortfolioInsight>,
    pub fund_recommendations: Vec<FundRecommendation>,
}

impl AnalysisResult {
    /// The zeroed result for a portfolio with no positions.
    pub fn empty() -> Self {
        Self {
            holdings_count: 0,
            total_value: 0.0,
            total_cost: 0.0,
            unrealized_pnl: 0.0,
            portfolio_return: 0.0,
            metrics: RiskMetrics {
                volatility: 0.0,
                annualized_return: 0.0,
                max_drawdown: None,
                var_95: 0.0,
                var_99: 0.0,
                var_95_amount: 0.0,
                var_99_amount: 0.0,
                var_method: VarMethod::Parametric,
                sharpe_ratio: 0.0,
                treynor_ratio: 0.0,
                beta: 0.0,
                beta_source: BetaSource::Unavailable,
                observations: 0,
            },
            diversification: DiversificationBreakdown {
                herfindahl_index: 0.0,
                effective_holdings: 0.0,
                is_well_diversified: false,
                largest_position_weight: 0.0,
                by_asset_type: Vec::new(),
                by_sector: Vec::new(),
                by_region: Vec::new(),
            },
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            fund_recommendations: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.holdings_count == 0
    }
}

/// Thresholds and assumptions for the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzerConfig {
    /// Annual risk-free rate (default: 0.02)
    pub risk_free_rate: f64,
    /// Market volatility assumed for the volatility-ratio beta (default: 0.16)
    pub market_volatility: f64,
    /// Region treated as home market; any other region tag counts as international
    pub domestic_region: String,

    /// Effective holdings above which a portfolio may be well diversified (default: 10)
    pub well_diversified_min_effective: f64,
    /// HHI below which a portfolio may be well diversified (default: 0.15)
    pub well_diversified_max_hhi: f64,
    /// HHI above which a portfolio is concentrated (default: 0.25)
    pub concentrated_hhi: f64,

    pub max_equity_weight: f64,
    pub min_fixed_income_weight: f64,
    pub max_single_position_weight: f64,
    pub max_sector_weight: f64,
    pub max_crypto_weight: f64,
    pub max_cash_weight: f64,
    pub high_volatility: f64,
    pub low_volatility: f64,
    pub strong_sharpe: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            market_volatility: 0.16,
            domestic_region: "US".to_string(),
            well_diversified_min_effective: 10.0,
            well_diversified_max_hhi: 0.15,
            concentrated_hhi: 0.25,
            max_equity_weight: 0.80,
            min_fixed_income_weight: 0.10,
            max_single_position_weight: 0.25,
            max_sector_weight: 0.40,
            max_crypto_weight: 0.10,
            max_cash_weight: 0.20,
            high_volatility: 0.25,
            low_volatility: 0.10,
            strong_sharpe: 1.0,
        }
    }
}
