use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::bar::Bar;
use crate::calendar::trading_days_from;
use crate::errors::MarketDataError;

/// An ordered daily price series for a single symbol.
///
/// Dates are strictly increasing. Returns are derived on demand and never stored.
/// Deserialization goes through [`PriceSeries::new`], so the ordering holds for
/// series read back from JSON too.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceSeries")]
pub struct PriceSeries {
    pub symbol: String,
    bars: Vec<Bar>,
}

/// Wire shape of [`PriceSeries`] before the date ordering is checked.
#[derive(Deserialize)]
struct RawPriceSeries {
    symbol: String,
    #[serde(default)]
    bars: Vec<Bar>,
}

impl TryFrom<RawPriceSeries> for PriceSeries {
    type Error = MarketDataError;

    fn try_from(raw: RawPriceSeries) -> Result<Self, Self::Error> {
        PriceSeries::new(raw.symbol, raw.bars)
    }
}

impl PriceSeries {
    /// Builds a series, rejecting bars that are not strictly increasing by date.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, MarketDataError> {
        let symbol = symbol.into();
        if let Some(pair) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(MarketDataError::invalid_series(
                symbol,
                format!(
                    "dates must be strictly increasing ({} followed by {})",
                    pair[0].date, pair[1].date
                ),
            ));
        }
        Ok(Self { symbol, bars })
    }

    /// An empty series. Callers that cannot work without data decide how to fall back.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    /// Lays `closes` on consecutive weekdays from `start` with flat OHLC and zero volume.
    pub fn from_closes(symbol: impl Into<String>, start: NaiveDate, closes: &[f64]) -> Self {
        let bars = trading_days_from(start, closes.len())
            .into_iter()
            .zip(closes.iter())
            .map(|(date, &close)| Bar::flat(date, close))
            .collect();
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Closing prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Simple close-to-close returns, one shorter than the series.
    ///
    /// A zero previous close produces a zero return instead of infinity.
    pub fn returns(&self) -> Vec<f64> {
        simple_returns(&self.closes())
    }

    /// Bars dated within `[start, end]`, inclusive on both ends.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Result<Self, MarketDataError> {
        let bars: Vec<Bar> = self
            .bars
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .cloned()
            .collect();
        if bars.is_empty() {
            return Err(MarketDataError::NoDataForRange);
        }
        Ok(Self {
            symbol: self.symbol.clone(),
            bars,
        })
    }
}

/// `(p[i] - p[i-1]) / p[i-1]` for each consecutive pair.
pub fn simple_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|w| if w[0] == 0.0 { 0.0 } else { (w[1] - w[0]) / w[0] })
        .collect()
}
