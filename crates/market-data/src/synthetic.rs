//! Synthetic price series generation.
//!
//! Produces a random-walk daily series for demos and for callers that have no
//! history yet. Randomness is always injected so a seeded generator reproduces
//! the same bars.

use chrono::{NaiveDate, Utc};
use log::debug;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::calendar::trading_days_until;
use crate::models::{Bar, PriceSeries};

/// Lowest price a synthetic bar can reach.
const PRICE_FLOOR: f64 = 0.01;

/// Parameters of the synthetic random walk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyntheticSeriesConfig {
    /// Number of trading days to generate (default: 252)
    pub days: usize,
    /// Close of the first bar (default: 100.0)
    pub start_price: f64,
    /// Mean daily return (default: 0.0003)
    pub daily_drift: f64,
    /// Standard deviation of daily returns (default: 0.02)
    pub daily_volatility: f64,
    /// Average traded volume (default: 1,000,000)
    pub base_volume: f64,
    /// Last trading day of the series. Today when absent.
    pub end_date: Option<NaiveDate>,
}

impl Default for SyntheticSeriesConfig {
    fn default() -> Self {
        Self {
            days: 252,
            start_price: 100.0,
            daily_drift: 0.0003,
            daily_volatility: 0.02,
            base_volume: 1_000_000.0,
            end_date: None,
        }
    }
}

/// Random-walk bar generator.
#[derive(Clone, Debug, Default)]
pub struct SyntheticSeriesGenerator {
    config: SyntheticSeriesConfig,
}

impl SyntheticSeriesGenerator {
    pub fn new(config: SyntheticSeriesConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SyntheticSeriesConfig {
        &self.config
    }

    /// Generates a weekday series of `config.days` bars for `symbol`.
    pub fn generate<R: Rng + ?Sized>(&self, symbol: &str, rng: &mut R) -> PriceSeries {
        let cfg = &self.config;
        let end = cfg.end_date.unwrap_or_else(|| Utc::now().date_naive());
        let dates = trading_days_until(end, cfg.days);

        let mut bars = Vec::with_capacity(dates.len());
        let mut prev_close = cfg.start_price.max(PRICE_FLOOR);

        for (i, date) in dates.into_iter().enumerate() {
            let close = if i == 0 {
                prev_close
            } else {
                let z: f64 = StandardNormal.sample(rng);
                (prev_close * (1.0 + cfg.daily_drift + cfg.daily_volatility * z)).max(PRICE_FLOOR)
            };

            let gap: f64 = StandardNormal.sample(rng);
            let open = (prev_close * (1.0 + gap * cfg.daily_volatility * 0.25)).max(PRICE_FLOOR);

            let wick_up: f64 = StandardNormal.sample(rng);
            let wick_down: f64 = StandardNormal.sample(rng);
            let high = open.max(close) * (1.0 + wick_up.abs() * cfg.daily_volatility * 0.5);
            let low = (open.min(close) * (1.0 - wick_down.abs() * cfg.daily_volatility * 0.5))
                .max(PRICE_FLOOR)
                .min(open.min(close));

            let volume = (cfg.base_volume * (0.5 + rng.gen::<f64>())).round();

            bars.push(Bar::new(date, open, high, low, close, volume));
            prev_close = close;
        }

        debug!(
            "Generated {} synthetic bars for {} ending {}",
            bars.len(),
            symbol,
            end
        );

        // Dates come from the weekday calendar, so ordering holds by construction.
        PriceSeries::new(symbol, bars).unwrap_or_else(|_| PriceSeries::empty(symbol))
    }
}
