//! Portfolio risk analyzer.
//!
//! Computes volatility, VaR, Sharpe/Treynor, beta, drawdown and a
//! diversification breakdown from holdings, then runs the insight rules.

use std::collections::HashMap;

use log::{debug, warn};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use super::analysis_model::{
    AllocationSlice, AnalysisResult, AnalyzerConfig, BetaSource, DiversificationBreakdown,
    MarketContext, RiskMetrics, VarMethod,
};
use super::insights::{evaluate_insights, InsightInputs};
use crate::constants::{
    EPSILON, MIN_HISTORICAL_VAR_OBSERVATIONS, TRADING_DAYS_PER_YEAR, VAR_HORIZON_DAYS,
    Z_SCORE_95, Z_SCORE_99,
};
use crate::errors::{Error, Result};
use crate::portfolio::holdings::{normalize_holdings, value_weights, AssetType, Holding};
use crate::utils::stats::{
    annualize_volatility, covariance, herfindahl, max_drawdown, mean, percentile_sorted,
    safe_div, sample_std_dev, sorted,
};

const UNCLASSIFIED: &str = "Unclassified";

/// Analyzes a set of holdings.
#[derive(Debug, Clone, Default)]
pub struct PortfolioRiskAnalyzer {
    config: AnalyzerConfig,
}

impl PortfolioRiskAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Runs the full analysis.
    ///
    /// Zero-quantity positions are dropped first; a portfolio with nothing left
    /// yields [`AnalysisResult::empty`]. Invalid holdings or non-finite context
    /// series are rejected.
    pub fn analyze(
        &self,
        holdings: &[Holding],
        context: Option<&MarketContext>,
    ) -> Result<AnalysisResult> {
        for holding in holdings {
            holding.validate()?;
        }
        if let Some(ctx) = context {
            validate_context(ctx)?;
        }

        let holdings = normalize_holdings(holdings.to_vec());
        if holdings.is_empty() {
            debug!("No open positions to analyze; returning empty result");
            return Ok(AnalysisResult::empty());
        }

        let weights = value_weights(&holdings);
        let total_value = to_f64(holdings.iter().map(Holding::market_value).sum());
        let total_cost = to_f64(holdings.iter().map(Holding::cost_basis).sum());
        let unrealized_pnl = total_value - total_cost;
        let portfolio_return = safe_div(unrealized_pnl, total_cost);

        let metrics = self.risk_metrics(&holdings, &weights, total_value, portfolio_return, context);
        let diversification = self.diversification(&holdings, &weights, total_value);

        let inputs = self.insight_inputs(&holdings, &weights, &diversification, &metrics);
        let insights = evaluate_insights(&inputs, &self.config);

        debug!(
            "Analyzed {} holdings: value={:.2} vol={:.4} sharpe={:.3} hhi={:.4}",
            holdings.len(),
            total_value,
            metrics.volatility,
            metrics.sharpe_ratio,
            diversification.herfindahl_index
        );

        Ok(AnalysisResult {
            holdings_count: holdings.len(),
            total_value,
            total_cost,
            unrealized_pnl,
            portfolio_return,
            metrics,
            diversification,
            strengths: insights.strengths,
            weaknesses: insights.weaknesses,
            fund_recommendations: insights.fund_recommendations,
        })
    }

    fn risk_metrics(
        &self,
        holdings: &[Holding],
        weights: &[f64],
        total_value: f64,
        portfolio_return: f64,
        context: Option<&MarketContext>,
    ) -> RiskMetrics {
        let daily = daily_returns(context);
        let sample = match daily {
            Some(returns) => returns.to_vec(),
            None => holdings.iter().map(Holding::return_pct).collect(),
        };
        let volatility = annualize_volatility(sample_std_dev(&sample));
        let annualized_return = match daily {
            Some(returns) => mean(returns) * TRADING_DAYS_PER_YEAR,
            None => portfolio_return,
        };

        let (var_95, var_99, var_method) = value_at_risk(&sample);

        let max_drawdown = context
            .map(|c| c.portfolio_value_history.as_slice())
            .filter(|history| history.len() >= 2)
            .map(max_drawdown);

        let excess = annualized_return - self.config.risk_free_rate;
        let sharpe_ratio = if volatility <= EPSILON {
            0.0
        } else {
            excess / volatility
        };

        let (beta, beta_source) = self.beta(holdings, weights, volatility, context);
        let treynor_ratio = safe_div(excess, beta);

        RiskMetrics {
            volatility,
            annualized_return,
            max_drawdown,
            var_95,
            var_99,
            var_95_amount: var_95 * total_value,
            var_99_amount: var_99 * total_value,
            var_method,
            sharpe_ratio,
            treynor_ratio,
            beta,
            beta_source,
            observations: sample.len(),
        }
    }

    /// Holding betas when every non-cash position reports one, then regression
    /// against market returns, then the volatility ratio.
    fn beta(
        &self,
        holdings: &[Holding],
        weights: &[f64],
        volatility: f64,
        context: Option<&MarketContext>,
    ) -> (f64, BetaSource) {
        let risky_all_tagged = holdings
            .iter()
            .filter(|h| h.asset_type != AssetType::Cash)
            .all(|h| h.beta.is_some());
        if risky_all_tagged && holdings.iter().any(|h| h.beta.is_some()) {
            let beta = holdings
                .iter()
                .zip(weights)
                .map(|(h, w)| w * h.beta.unwrap_or(0.0))
                .sum();
            return (beta, BetaSource::Holdings);
        }

        if let Some(ctx) = context {
            let (p, m) = (&ctx.portfolio_returns, &ctx.market_returns);
            if p.len() >= 2 && p.len() == m.len() {
                let market_variance = sample_std_dev(m).powi(2);
                if market_variance > EPSILON {
                    return (covariance(p, m) / market_variance, BetaSource::Regression);
                }
                warn!("Market returns have no variance; falling back to volatility ratio beta");
            } else if !m.is_empty() {
                warn!(
                    "Market returns ({}) not aligned with portfolio returns ({}); ignoring",
                    m.len(),
                    p.len()
                );
            }
        }

        (
            safe_div(volatility, self.config.market_volatility),
            BetaSource::VolatilityRatio,
        )
    }

    fn diversification(
        &self,
        holdings: &[Holding],
        weights: &[f64],
        total_value: f64,
    ) -> DiversificationBreakdown {
        let herfindahl_index = herfindahl(weights);
        let effective_holdings = safe_div(1.0, herfindahl_index);
        let is_well_diversified = effective_holdings > self.config.well_diversified_min_effective
            && herfindahl_index < self.config.well_diversified_max_hhi;
        let largest_position_weight = weights.iter().copied().fold(0.0, f64::max);

        DiversificationBreakdown {
            herfindahl_index,
            effective_holdings,
            is_well_diversified,
            largest_position_weight,
            by_asset_type: allocation(holdings, total_value, |h| h.asset_type.to_string()),
            by_sector: allocation(holdings, total_value, |h| tag_or_unclassified(&h.sector)),
            by_region: allocation(holdings, total_value, |h| tag_or_unclassified(&h.region)),
        }
    }

    fn insight_inputs(
        &self,
        holdings: &[Holding],
        weights: &[f64],
        diversification: &DiversificationBreakdown,
        metrics: &RiskMetrics,
    ) -> InsightInputs {
        let weight_where = |pred: &dyn Fn(&Holding) -> bool| -> f64 {
            holdings
                .iter()
                .zip(weights)
                .filter(|(h, _)| pred(h))
                .map(|(_, w)| w)
                .sum()
        };

        let largest_position = holdings
            .iter()
            .zip(weights)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(h, w)| (h.symbol.clone(), *w));

        let largest_sector = diversification
            .by_sector
            .iter()
            .find(|slice| slice.key != UNCLASSIFIED)
            .map(|slice| (slice.key.clone(), slice.weight));

        let domestic = self.config.domestic_region.trim();
        let has_international_exposure = holdings.iter().any(|h| {
            h.region
                .as_deref()
                .map(str::trim)
                .is_some_and(|r| !r.is_empty() && !r.eq_ignore_ascii_case(domestic))
        });

        InsightInputs {
            holdings_count: holdings.len(),
            equity_weight: weight_where(&|h| h.asset_type.is_equity()),
            fixed_income_weight: weight_where(&|h| h.asset_type == AssetType::Bond),
            crypto_weight: weight_where(&|h| h.asset_type == AssetType::Crypto),
            cash_weight: weight_where(&|h| h.asset_type == AssetType::Cash),
            largest_position,
            largest_sector,
            has_international_exposure,
            herfindahl_index: diversification.herfindahl_index,
            effective_holdings: diversification.effective_holdings,
            is_well_diversified: diversification.is_well_diversified,
            sharpe_ratio: metrics.sharpe_ratio,
            volatility: metrics.volatility,
        }
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn tag_or_unclassified(tag: &Option<String>) -> String {
    match tag.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => UNCLASSIFIED.to_string(),
    }
}

/// Supplied daily portfolio returns, when there are at least two. Without them
/// the statistics fall back to per-holding price returns.
fn daily_returns(context: Option<&MarketContext>) -> Option<&[f64]> {
    context
        .map(|ctx| ctx.portfolio_returns.as_slice())
        .filter(|returns| returns.len() >= 2)
}

/// 10-day VaR at 95% and 99% as positive loss fractions.
pub(crate) fn value_at_risk(sample: &[f64]) -> (f64, f64, VarMethod) {
    let horizon = VAR_HORIZON_DAYS.sqrt();
    if sample.len() < MIN_HISTORICAL_VAR_OBSERVATIONS {
        let m = mean(sample);
        let sigma = sample_std_dev(sample);
        let var = |z: f64| (-(m - z * sigma) * horizon).max(0.0);
        (var(Z_SCORE_95), var(Z_SCORE_99), VarMethod::Parametric)
    } else {
        let ordered = sorted(sample);
        let var = |p: f64| (-percentile_sorted(&ordered, p) * horizon).max(0.0);
        (var(0.05), var(0.01), VarMethod::Historical)
    }
}

fn allocation<F>(holdings: &[Holding], total_value: f64, key_fn: F) -> Vec<AllocationSlice>
where
    F: Fn(&Holding) -> String,
{
    let mut buckets: HashMap<String, f64> = HashMap::new();
    for holding in holdings {
        *buckets.entry(key_fn(holding)).or_insert(0.0) += holding.market_value_f64();
    }

    let mut slices: Vec<AllocationSlice> = buckets
        .into_iter()
        .map(|(key, value)| AllocationSlice {
            weight: safe_div(value, total_value),
            key,
            value,
        })
        .collect();
    slices.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.key.cmp(&b.key)));
    slices
}

fn validate_context(ctx: &MarketContext) -> Result<()> {
    let series = [
        ("portfolio value history", &ctx.portfolio_value_history),
        ("portfolio returns", &ctx.portfolio_returns),
        ("market returns", &ctx.market_returns),
    ];
    for (name, values) in series {
        if let Some(v) = values.iter().find(|v| !v.is_finite()) {
            return Err(Error::invalid_input(format!(
                "{} must contain finite numbers, got {}",
                name, v
            )));
        }
    }
    if let Some(v) = ctx.portfolio_value_history.iter().find(|v| **v < 0.0) {
        return Err(Error::invalid_input(format!(
            "portfolio value history must be non-negative, got {}",
            v
        )));
    }
    Ok(())
}
