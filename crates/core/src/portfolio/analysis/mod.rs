//! Portfolio analysis module - risk metrics, diversification and insights.

mod analysis_model;
mod insights;
mod risk_analyzer;

pub use analysis_model::{
    AllocationSlice, AnalysisResult, AnalyzerConfig, BetaSource, DiversificationBreakdown,
    FundCategory, FundRecommendation, InsightKind, MarketContext, PortfolioInsight, RiskMetrics,
    VarMethod,
};
pub use insights::{evaluate_insights, InsightInputs, Insights};
pub use risk_analyzer::PortfolioRiskAnalyzer;
