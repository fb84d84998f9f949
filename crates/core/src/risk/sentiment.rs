//! News sentiment input for the risk scorer.
//!
//! Callers classify news themselves and hand over one of two well-typed shapes.
//! Both reduce to a [`SentimentSummary`]; anything malformed is rejected here so
//! the scorer never has to guess.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::utils::stats::population_std_dev;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Bullish,
    Bearish,
    Neutral,
}

/// One classified article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSentiment {
    pub label: SentimentLabel,
    /// Polarity in [-1, 1]
    pub score: f64,
}

/// Sentiment analysis supplied alongside market data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NewsSentiment {
    /// Pre-aggregated percentages (0-100) and polarity volatility.
    #[serde(rename_all = "camelCase")]
    Breakdown {
        bullish: f64,
        bearish: f64,
        #[serde(default)]
        neutral: f64,
        #[serde(default)]
        volatility: f64,
    },
    /// Per-article classifications, aggregated here.
    Articles { articles: Vec<ArticleSentiment> },
}

/// Aggregate the scorer works from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentSummary {
    /// Share of bullish news, 0-100
    pub bullish: f64,
    /// Share of bearish news, 0-100
    pub bearish: f64,
    /// Dispersion of polarity scores
    pub volatility: f64,
}

impl NewsSentiment {
    /// Validates and reduces the input.
    ///
    /// Returns `Ok(None)` for an empty article list, which the scorer treats the
    /// same as no analysis at all.
    pub fn summarize(&self) -> Result<Option<SentimentSummary>> {
        match self {
            NewsSentiment::Breakdown {
                bullish,
                bearish,
                neutral,
                volatility,
            } => {
                for (name, value) in [("bullish", *bullish), ("bearish", *bearish), ("neutral", *neutral)] {
                    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                        return Err(Error::invalid_input(format!(
                            "sentiment {} percentage must be within 0-100, got {}",
                            name, value
                        )));
                    }
                }
                if !volatility.is_finite() || *volatility < 0.0 {
                    return Err(Error::invalid_input(format!(
                        "sentiment volatility must be a non-negative number, got {}",
                        volatility
                    )));
                }
                Ok(Some(SentimentSummary {
                    bullish: *bullish,
                    bearish: *bearish,
                    volatility: *volatility,
                }))
            }
            NewsSentiment::Articles { articles } => {
                if articles.is_empty() {
                    return Ok(None);
                }
                if let Some(bad) = articles
                    .iter()
                    .find(|a| !a.score.is_finite() || !(-1.0..=1.0).contains(&a.score))
                {
                    return Err(Error::invalid_input(format!(
                        "article sentiment score must be within [-1, 1], got {}",
                        bad.score
                    )));
                }

                let total = articles.len() as f64;
                let share = |label: SentimentLabel| {
                    articles.iter().filter(|a| a.label == label).count() as f64 / total * 100.0
                };
                let scores: Vec<f64> = articles.iter().map(|a| a.score).collect();

                Ok(Some(SentimentSummary {
                    bullish: share(SentimentLabel::Bullish),
                    bearish: share(SentimentLabel::Bearish),
                    volatility: population_std_dev(&scores),
                }))
            }
        }
    }
}
