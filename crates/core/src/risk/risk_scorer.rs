//! Composite risk scorer.
//!
//! Five component scores (market, credit, liquidity, sentiment, systemic) are
//! computed independently, clamped to [0, 100], then combined with fixed
//! weights. The scorer is a pure function of its inputs and configuration.

use log::{debug, warn};

use super::recommendations::build_recommendations;
use super::risk_model::{
    MarketSnapshot, PortfolioProfile, RiskComponents, RiskLevel, RiskScoreResult, RiskScorerConfig,
};
use super::sentiment::{NewsSentiment, SentimentSummary};
use crate::errors::{Error, Result};
use crate::portfolio::holdings::{value_weights, AssetType, Holding};
use crate::utils::stats::{annualize_volatility, herfindahl, sample_std_dev};
use quantfolio_market_data::simple_returns;

const SENTIMENT_EXTREME_PCT: f64 = 70.0;
const SENTIMENT_EXTREME_PENALTY: f64 = 15.0;

pub(crate) fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

/// Scores portfolio risk on a 0-100 scale.
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: RiskScorerConfig,
}

impl RiskScorer {
    pub fn new(config: RiskScorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskScorerConfig {
        &self.config
    }

    /// Computes the composite score, level and recommendations.
    ///
    /// Missing optional fields fall back to configured defaults. Non-finite
    /// required numbers (total value, weights, closes) are rejected.
    pub fn score(
        &self,
        market: &MarketSnapshot,
        portfolio: &PortfolioProfile,
        sentiment: Option<&NewsSentiment>,
    ) -> Result<RiskScoreResult> {
        validate_required(market, portfolio)?;

        let summary = match sentiment {
            Some(input) => input.summarize()?,
            None => None,
        };

        let beta = match portfolio.beta {
            Some(b) if b.is_finite() => b,
            Some(b) => {
                warn!("Ignoring non-finite beta {}; using default", b);
                self.config.default_beta
            }
            None => self.config.default_beta,
        };
        let volatility = self.volatility(market);

        let components = RiskComponents {
            market: self.market_risk(volatility, beta),
            credit: self.credit_risk(portfolio),
            liquidity: self.liquidity_risk(portfolio.total_value, market),
            sentiment: self.sentiment_risk(summary.as_ref()),
            systemic: self.systemic_risk(market),
        };

        let composite = clamp_score(self.config.weights.apply(&components).round());
        let total_risk = composite as u8;
        let level = RiskLevel::from_score(composite);

        debug!(
            "Risk score {} ({}) market={:.1} credit={:.1} liquidity={:.1} sentiment={:.1} systemic={:.1}",
            total_risk,
            level,
            components.market,
            components.credit,
            components.liquidity,
            components.sentiment,
            components.systemic
        );

        Ok(RiskScoreResult {
            total_risk,
            components,
            level,
            recommendations: build_recommendations(level, &components),
        })
    }

    /// Derives a profile from holdings: value weights, crypto and emerging-market
    /// exposure, high-yield bonds, and a value-weighted beta when any holding
    /// reports one.
    pub fn profile_from_holdings(&self, holdings: &[Holding]) -> PortfolioProfile {
        let weights = value_weights(holdings);
        let total_value: f64 = holdings.iter().map(Holding::market_value_f64).sum();

        let crypto_exposure = holdings
            .iter()
            .any(|h| h.asset_type == AssetType::Crypto && !h.quantity.is_zero());

        let emerging_markets = holdings.iter().any(|h| {
            h.region.as_deref().is_some_and(|region| {
                self.config
                    .emerging_market_regions
                    .iter()
                    .any(|em| em.eq_ignore_ascii_case(region.trim()))
            })
        });

        let high_yield = holdings.iter().any(|h| {
            h.asset_type == AssetType::Bond
                && h.style.as_deref().is_some_and(|style| {
                    let normalized = style.to_ascii_lowercase().replace(['-', '_'], " ");
                    normalized.contains("high yield") || normalized.contains("junk")
                })
        });

        let beta = if holdings.iter().any(|h| h.beta.is_some()) {
            Some(
                holdings
                    .iter()
                    .zip(&weights)
                    .map(|(h, w)| w * h.beta.unwrap_or(self.config.default_beta))
                    .sum(),
            )
        } else {
            None
        };

        PortfolioProfile {
            total_value,
            beta,
            high_yield,
            emerging_markets,
            crypto_exposure,
            weights,
        }
    }

    // -------------------------------------------------------------------------
    // Components
    // -------------------------------------------------------------------------

    pub(crate) fn market_risk(&self, volatility: f64, beta: f64) -> f64 {
        let volatility_score = match volatility {
            v if v < 0.10 => 10.0,
            v if v < 0.20 => 20.0,
            v if v < 0.30 => 30.0,
            _ => 40.0,
        };

        let beta_distance = (beta - 1.0).abs();
        let beta_score = match beta_distance {
            d if d < 0.3 => 10.0,
            d if d < 0.6 => 20.0,
            _ => 30.0,
        };

        let stress_score = self.max_stress_loss(beta) * self.config.stress_loss_multiplier;

        clamp_score(volatility_score + beta_score + stress_score)
    }

    /// Largest loss magnitude across the configured scenarios.
    pub fn max_stress_loss(&self, beta: f64) -> f64 {
        self.config
            .stress_scenarios
            .iter()
            .map(|s| s.loss(beta))
            .fold(0.0, f64::max)
    }

    pub(crate) fn credit_risk(&self, portfolio: &PortfolioProfile) -> f64 {
        let mut score = 30.0;
        if portfolio.high_yield {
            score += 20.0;
        }
        if portfolio.emerging_markets {
            score += 15.0;
        }
        if portfolio.crypto_exposure {
            score += 25.0;
        }

        let hhi = herfindahl(&portfolio.weights);
        let diversification = if hhi > 0.0 { 1.0 - hhi } else { 0.0 };
        score -= 10.0 * diversification;

        clamp_score(score)
    }

    pub(crate) fn liquidity_risk(&self, total_value: f64, market: &MarketSnapshot) -> f64 {
        let average_volume = self.optional_or_default(
            "average volume",
            market.average_volume,
            self.config.default_average_volume,
            false,
        );
        let spread = self.optional_or_default(
            "bid-ask spread",
            market.bid_ask_spread,
            self.config.default_bid_ask_spread,
            true,
        );

        let size_ratio = total_value / average_volume;
        let size_score = match size_ratio {
            r if r < 0.01 => 0.0,
            r if r < 0.05 => 10.0,
            r if r < 0.10 => 20.0,
            _ => 30.0,
        };

        let spread_score = (spread * 10_000.0).min(40.0);

        clamp_score(20.0 + size_score + spread_score)
    }

    pub(crate) fn sentiment_risk(&self, summary: Option<&SentimentSummary>) -> f64 {
        let Some(s) = summary else {
            return clamp_score(self.config.default_sentiment_score);
        };

        let mut score = s.bearish + s.volatility * 20.0;
        if s.bearish > SENTIMENT_EXTREME_PCT || s.bullish > SENTIMENT_EXTREME_PCT {
            score += SENTIMENT_EXTREME_PENALTY;
        }
        clamp_score(score)
    }

    pub(crate) fn systemic_risk(&self, market: &MarketSnapshot) -> f64 {
        let correlation = match market.average_correlation {
            Some(c) if c.is_finite() => c,
            Some(c) => {
                warn!("Ignoring non-finite correlation {}; using default", c);
                self.config.default_correlation
            }
            None => self.config.default_correlation,
        };
        let contagion = match market.contagion_indicator {
            Some(c) if c.is_finite() => c.clamp(0.0, 1.0),
            Some(c) => {
                warn!("Ignoring non-finite contagion indicator {}; using default", c);
                self.config.default_contagion
            }
            None => self.config.default_contagion,
        };

        let correlation_score = match correlation {
            c if c < 0.3 => 0.0,
            c if c < 0.5 => 10.0,
            c if c < 0.7 => 20.0,
            _ => 30.0,
        };

        clamp_score(30.0 + correlation_score + contagion * 30.0)
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    /// Explicit override, else annualized sample volatility of closes, else default.
    pub(crate) fn volatility(&self, market: &MarketSnapshot) -> f64 {
        if let Some(v) = market.volatility {
            if v.is_finite() && v >= 0.0 {
                return v;
            }
            warn!("Ignoring invalid volatility override {}; estimating instead", v);
        }

        let returns = simple_returns(&market.closes);
        if returns.len() >= 2 {
            annualize_volatility(sample_std_dev(&returns))
        } else {
            self.config.default_volatility
        }
    }

    /// Returns `value` when usable, else `default`. Zero is allowed only when
    /// `allow_zero` is set.
    fn optional_or_default(&self, name: &str, value: Option<f64>, default: f64, allow_zero: bool) -> f64 {
        match value {
            Some(v) if v.is_finite() && (v > 0.0 || (allow_zero && v == 0.0)) => v,
            Some(v) => {
                warn!("Ignoring invalid {} {}; using default {}", name, v, default);
                default
            }
            None => default,
        }
    }
}

fn validate_required(market: &MarketSnapshot, portfolio: &PortfolioProfile) -> Result<()> {
    if !portfolio.total_value.is_finite() || portfolio.total_value < 0.0 {
        return Err(Error::invalid_input(format!(
            "portfolio total value must be a non-negative number, got {}",
            portfolio.total_value
        )));
    }
    if let Some(w) = portfolio.weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(Error::invalid_input(format!(
            "portfolio weights must be non-negative numbers, got {}",
            w
        )));
    }
    if let Some(c) = market.closes.iter().find(|c| !c.is_finite()) {
        return Err(Error::invalid_input(format!(
            "closing prices must be finite, got {}",
            c
        )));
    }
    Ok(())
}
