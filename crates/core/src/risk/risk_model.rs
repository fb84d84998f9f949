//! Risk scoring domain models.
//!
//! - Risk levels and their fixed score bands
//! - Component breakdown and the composite result
//! - Advisory recommendation records
//! - Scorer inputs and configuration

use serde::{Deserialize, Serialize};

// =============================================================================
// Risk Level
// =============================================================================

/// Discrete risk classification of a composite score.
///
/// Bands are half-open `[lower, upper)` except EXTREME, which includes 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Minimal,
    Low,
    Moderate,
    Elevated,
    High,
    Extreme,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 6] = [
        RiskLevel::Minimal,
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::Elevated,
        RiskLevel::High,
        RiskLevel::Extreme,
    ];

    /// Classifies a score. Scores below 0 map to MINIMAL and above 100 to EXTREME.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s < 20.0 => RiskLevel::Minimal,
            s if s < 40.0 => RiskLevel::Low,
            s if s < 60.0 => RiskLevel::Moderate,
            s if s < 75.0 => RiskLevel::Elevated,
            s if s < 90.0 => RiskLevel::High,
            _ => RiskLevel::Extreme,
        }
    }

    /// Inclusive lower bound of the band.
    pub fn lower_bound(&self) -> f64 {
        match self {
            RiskLevel::Minimal => 0.0,
            RiskLevel::Low => 20.0,
            RiskLevel::Moderate => 40.0,
            RiskLevel::Elevated => 60.0,
            RiskLevel::High => 75.0,
            RiskLevel::Extreme => 90.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "MINIMAL",
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::Elevated => "ELEVATED",
            RiskLevel::High => "HIGH",
            RiskLevel::Extreme => "EXTREME",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Recommendations
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendationType {
    Overall,
    MarketRisk,
    LiquidityRisk,
    CreditRisk,
    SystemicRisk,
}

/// Ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

/// A fixed advisory template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub recommendation_type: RecommendationType,
    pub priority: Priority,
    pub action: String,
    pub detail: String,
}

// =============================================================================
// Result
// =============================================================================

/// Per-dimension scores, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskComponents {
    pub market: f64,
    pub credit: f64,
    pub liquidity: f64,
    pub sentiment: f64,
    pub systemic: f64,
}

impl RiskComponents {
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.market,
            self.credit,
            self.liquidity,
            self.sentiment,
            self.systemic,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskScoreResult {
    /// Weighted composite, rounded, in [0, 100]
    pub total_risk: u8,
    pub components: RiskComponents,
    pub level: RiskLevel,
    pub recommendations: Vec<Recommendation>,
}

// =============================================================================
// Inputs
// =============================================================================

/// Market observations for the scored portfolio. Every field is optional except
/// that `closes`, when given, must be finite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketSnapshot {
    /// Recent closing prices used to estimate volatility
    pub closes: Vec<f64>,
    /// Annualized volatility override
    pub volatility: Option<f64>,
    /// Average traded volume
    pub average_volume: Option<f64>,
    /// Bid-ask spread as a fraction of price
    pub bid_ask_spread: Option<f64>,
    /// Average pairwise correlation across held assets
    pub average_correlation: Option<f64>,
    /// Contagion indicator in [0, 1]
    pub contagion_indicator: Option<f64>,
}

/// Portfolio characteristics the scorer needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioProfile {
    pub total_value: f64,
    pub beta: Option<f64>,
    pub high_yield: bool,
    pub emerging_markets: bool,
    pub crypto_exposure: bool,
    /// Position weights, normalized by the scorer
    pub weights: Vec<f64>,
}

/// A fixed shock applied to the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressScenario {
    pub name: String,
    /// Market move, e.g. -0.20 for a 20% crash
    pub shock: f64,
}

impl StressScenario {
    pub fn new(name: impl Into<String>, shock: f64) -> Self {
        Self {
            name: name.into(),
            shock,
        }
    }

    /// Loss magnitude for a portfolio with the given beta.
    pub fn loss(&self, beta: f64) -> f64 {
        (self.shock * beta).abs()
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Composite weights. Must sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskWeights {
    pub market: f64,
    pub credit: f64,
    pub liquidity: f64,
    pub sentiment: f64,
    pub systemic: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            market: 0.35,
            credit: 0.20,
            liquidity: 0.15,
            sentiment: 0.15,
            systemic: 0.15,
        }
    }
}

impl RiskWeights {
    pub fn sum(&self) -> f64 {
        self.market + self.credit + self.liquidity + self.sentiment + self.systemic
    }

    pub fn apply(&self, c: &RiskComponents) -> f64 {
        c.market * self.market
            + c.credit * self.credit
            + c.liquidity * self.liquidity
            + c.sentiment * self.sentiment
            + c.systemic * self.systemic
    }
}

/// Fallbacks and tunables for the risk scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskScorerConfig {
    pub weights: RiskWeights,

    /// Beta assumed when the portfolio does not report one (default: 1.0)
    pub default_beta: f64,

    /// Annualized volatility assumed without price history (default: 0.15)
    pub default_volatility: f64,

    /// Average volume assumed when unknown (default: 1,000,000)
    pub default_average_volume: f64,

    /// Bid-ask spread assumed when unknown (default: 0.001)
    pub default_bid_ask_spread: f64,

    /// Average correlation assumed when unknown (default: 0.5)
    pub default_correlation: f64,

    /// Contagion indicator assumed when unknown (default: 0.0)
    pub default_contagion: f64,

    /// Sentiment score without news analysis (default: 50)
    pub default_sentiment_score: f64,

    /// Stress scenarios for the market component
    pub stress_scenarios: Vec<StressScenario>,

    /// Points per unit of maximum stress loss (default: 150)
    pub stress_loss_multiplier: f64,

    /// Region tags that count as emerging markets (case-insensitive)
    pub emerging_market_regions: Vec<String>,
}

impl Default for RiskScorerConfig {
    fn default() -> Self {
        Self {
            weights: RiskWeights::default(),
            default_beta: 1.0,
            default_volatility: 0.15,
            default_average_volume: 1_000_000.0,
            default_bid_ask_spread: 0.001,
            default_correlation: 0.5,
            default_contagion: 0.0,
            default_sentiment_score: 50.0,
            stress_scenarios: vec![
                StressScenario::new("Market crash", -0.20),
                StressScenario::new("Rate shock", -0.10),
                StressScenario::new("Currency crisis", -0.15),
            ],
            stress_loss_multiplier: 150.0,
            emerging_market_regions: vec![
                "emerging".to_string(),
                "emerging markets".to_string(),
                "em".to_string(),
                "latam".to_string(),
                "asia ex-japan".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_bands_are_contiguous() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Minimal);
        assert_eq!(RiskLevel::from_score(19.999), RiskLevel::Minimal);
        assert_eq!(RiskLevel::from_score(20.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(40.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(60.0), RiskLevel::Elevated);
        assert_eq!(RiskLevel::from_score(75.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(89.9), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(90.0), RiskLevel::Extreme);
        assert_eq!(RiskLevel::from_score(100.0), RiskLevel::Extreme);
    }

    #[test]
    fn test_lower_bounds_match_classification() {
        for level in RiskLevel::ALL {
            assert_eq!(RiskLevel::from_score(level.lower_bound()), level);
        }
    }

    #[test]
    fn test_level_serialization() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::Elevated).unwrap(),
            "\"ELEVATED\""
        );
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((RiskWeights::default().sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_recommendation_type_field_name() {
        let rec = Recommendation {
            recommendation_type: RecommendationType::Overall,
            priority: Priority::Low,
            action: "a".to_string(),
            detail: "d".to_string(),
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "OVERALL");
        assert_eq!(json["priority"], "LOW");
    }

    #[test]
    fn test_stress_loss_scales_with_beta() {
        let crash = StressScenario::new("crash", -0.20);
        assert!((crash.loss(1.0) - 0.20).abs() < 1e-12);
        assert!((crash.loss(1.5) - 0.30).abs() < 1e-12);
    }
}
