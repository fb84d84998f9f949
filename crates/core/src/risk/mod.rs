//! Risk scoring module - composite 0-100 score over five risk dimensions.

mod recommendations;
mod risk_model;
mod risk_scorer;
mod sentiment;

pub use recommendations::{build_recommendations, overall_recommendation};
pub use risk_model::{
    MarketSnapshot, PortfolioProfile, Priority, Recommendation, RecommendationType,
    RiskComponents, RiskLevel, RiskScoreResult, RiskScorerConfig, RiskWeights, StressScenario,
};
pub use risk_scorer::RiskScorer;
pub use sentiment::{ArticleSentiment, NewsSentiment, SentimentLabel, SentimentSummary};
