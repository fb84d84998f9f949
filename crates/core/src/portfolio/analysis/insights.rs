//! Threshold rules that turn analyzer metrics into strengths, weaknesses and
//! fund-category recommendations.
//!
//! Rules run in a fixed order and use only their inputs, so the same metrics
//! always produce the same insights.

use super::analysis_model::{
    AnalyzerConfig, FundCategory, FundRecommendation, InsightKind, PortfolioInsight,
};
use crate::risk::Priority;

/// Metrics the rules look at.
#[derive(Debug, Clone, Default)]
pub struct InsightInputs {
    pub holdings_count: usize,
    pub equity_weight: f64,
    pub fixed_income_weight: f64,
    pub crypto_weight: f64,
    pub cash_weight: f64,
    /// Symbol and weight of the largest position
    pub largest_position: Option<(String, f64)>,
    /// Name and weight of the largest classified sector
    pub largest_sector: Option<(String, f64)>,
    pub has_international_exposure: bool,
    pub herfindahl_index: f64,
    pub effective_holdings: f64,
    pub is_well_diversified: bool,
    pub sharpe_ratio: f64,
    pub volatility: f64,
}

/// Collected rule outcomes.
#[derive(Debug, Clone, Default)]
pub struct Insights {
    pub strengths: Vec<PortfolioInsight>,
    pub weaknesses: Vec<PortfolioInsight>,
    pub fund_recommendations: Vec<FundRecommendation>,
}

impl Insights {
    fn strength(&mut self, code: &str, title: &str, detail: String) {
        self.strengths.push(insight(InsightKind::Strength, code, title, detail));
    }

    fn weakness(&mut self, code: &str, title: &str, detail: String) {
        self.weaknesses.push(insight(InsightKind::Weakness, code, title, detail));
    }

    /// Adds a fund recommendation, merging with an existing one of the same
    /// category by keeping the higher priority and the first reason.
    fn recommend(&mut self, category: FundCategory, priority: Priority, reason: String) {
        if let Some(existing) = self
            .fund_recommendations
            .iter_mut()
            .find(|r| r.category == category)
        {
            existing.priority = existing.priority.max(priority);
            return;
        }
        self.fund_recommendations.push(FundRecommendation {
            category,
            priority,
            reason,
        });
    }
}

fn insight(kind: InsightKind, code: &str, title: &str, detail: String) -> PortfolioInsight {
    PortfolioInsight {
        kind,
        code: code.to_string(),
        title: title.to_string(),
        detail,
    }
}

fn pct(weight: f64) -> String {
    format!("{:.1}%", weight * 100.0)
}

/// Evaluates every rule in order.
pub fn evaluate_insights(inputs: &InsightInputs, config: &AnalyzerConfig) -> Insights {
    let mut out = Insights::default();
    if inputs.holdings_count == 0 {
        return out;
    }

    // --- Allocation ---
    if inputs.equity_weight > config.max_equity_weight {
        out.weakness(
            "EQUITY_CONCENTRATION",
            "Equity concentration",
            format!(
                "Equities make up {} of the portfolio, above the {} guideline.",
                pct(inputs.equity_weight),
                pct(config.max_equity_weight)
            ),
        );
        out.recommend(
            FundCategory::AggregateBond,
            Priority::High,
            "Balance heavy equity exposure with fixed income.".to_string(),
        );
    }

    if inputs.fixed_income_weight < config.min_fixed_income_weight {
        out.weakness(
            "LOW_FIXED_INCOME",
            "Little fixed income",
            format!(
                "Bonds are {} of the portfolio; a cushion of at least {} dampens drawdowns.",
                pct(inputs.fixed_income_weight),
                pct(config.min_fixed_income_weight)
            ),
        );
        out.recommend(
            FundCategory::AggregateBond,
            Priority::Medium,
            "Add a core bond allocation to lower overall volatility.".to_string(),
        );
    } else {
        out.strength(
            "FIXED_INCOME_CUSHION",
            "Fixed income cushion",
            format!("Bonds make up {} of the portfolio.", pct(inputs.fixed_income_weight)),
        );
    }

    if inputs.has_international_exposure {
        out.strength(
            "INTERNATIONAL_EXPOSURE",
            "International exposure",
            "Holdings span more than the home market.".to_string(),
        );
    } else {
        out.weakness(
            "NO_INTERNATIONAL_EXPOSURE",
            "Home market only",
            "No holdings are tagged outside the home region.".to_string(),
        );
        out.recommend(
            FundCategory::GlobalEquity,
            Priority::Medium,
            "Add international equities to diversify country risk.".to_string(),
        );
    }

    if inputs.crypto_weight > config.max_crypto_weight {
        out.weakness(
            "SPECULATIVE_EXPOSURE",
            "Large crypto allocation",
            format!(
                "Crypto assets are {} of the portfolio, above {}.",
                pct(inputs.crypto_weight),
                pct(config.max_crypto_weight)
            ),
        );
    }

    if inputs.cash_weight > config.max_cash_weight {
        out.weakness(
            "CASH_DRAG",
            "High cash balance",
            format!(
                "Cash is {} of the portfolio and earns little over time.",
                pct(inputs.cash_weight)
            ),
        );
        out.recommend(
            FundCategory::DividendIncome,
            Priority::Low,
            "Put idle cash to work in income-producing funds.".to_string(),
        );
    }

    // --- Concentration ---
    if let Some((symbol, weight)) = &inputs.largest_position {
        if *weight > config.max_single_position_weight && inputs.holdings_count > 1 {
            out.weakness(
                "POSITION_CONCENTRATION",
                "Single position concentration",
                format!(
                    "{} alone is {} of the portfolio.",
                    symbol,
                    pct(*weight)
                ),
            );
            out.recommend(
                FundCategory::BroadMarketIndex,
                Priority::High,
                "Spread single-stock risk across a broad index.".to_string(),
            );
        }
    }

    if let Some((sector, weight)) = &inputs.largest_sector {
        if *weight > config.max_sector_weight {
            out.weakness(
                "SECTOR_CONCENTRATION",
                "Sector concentration",
                format!("{} accounts for {} of the portfolio.", sector, pct(*weight)),
            );
            out.recommend(
                FundCategory::BroadMarketIndex,
                Priority::Medium,
                "Broaden sector exposure with a total-market fund.".to_string(),
            );
        }
    }

    if inputs.is_well_diversified {
        out.strength(
            "WELL_DIVERSIFIED",
            "Well diversified",
            format!(
                "Effective number of holdings is {:.1} (HHI {:.3}).",
                inputs.effective_holdings, inputs.herfindahl_index
            ),
        );
    } else if inputs.herfindahl_index > config.concentrated_hhi {
        out.weakness(
            "POOR_DIVERSIFICATION",
            "Concentrated portfolio",
            format!(
                "Effective number of holdings is only {:.1} (HHI {:.3}).",
                inputs.effective_holdings, inputs.herfindahl_index
            ),
        );
        out.recommend(
            FundCategory::BroadMarketIndex,
            Priority::Medium,
            "Diversify across more positions.".to_string(),
        );
    }

    // --- Risk and return ---
    if inputs.sharpe_ratio > config.strong_sharpe {
        out.strength(
            "STRONG_RISK_ADJUSTED_RETURN",
            "Strong risk-adjusted return",
            format!("Sharpe ratio of {:.2}.", inputs.sharpe_ratio),
        );
    } else if inputs.sharpe_ratio < 0.0 {
        out.weakness(
            "NEGATIVE_RISK_ADJUSTED_RETURN",
            "Return below the risk-free rate",
            format!("Sharpe ratio of {:.2}.", inputs.sharpe_ratio),
        );
    }

    if inputs.volatility > config.high_volatility {
        out.weakness(
            "HIGH_VOLATILITY",
            "High volatility",
            format!("Annualized volatility is {}.", pct(inputs.volatility)),
        );
        out.recommend(
            FundCategory::LowVolatilityEquity,
            Priority::Medium,
            "Low-volatility funds can smooth returns.".to_string(),
        );
    } else if inputs.volatility > 0.0 && inputs.volatility < config.low_volatility {
        out.strength(
            "LOW_VOLATILITY",
            "Low volatility",
            format!("Annualized volatility is {}.", pct(inputs.volatility)),
        );
    }

    out.fund_recommendations
        .sort_by(|a, b| b.priority.cmp(&a.priority));
    out
}
