use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date of the bar
    pub date: NaiveDate,

    /// Opening price
    pub open: f64,

    /// Session high
    pub high: f64,

    /// Session low
    pub low: f64,

    /// Closing price
    pub close: f64,

    /// Traded volume
    pub volume: f64,
}

impl Bar {
    /// Create a full OHLCV bar
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Create a bar where every price equals `close` and volume is zero.
    pub fn flat(date: NaiveDate, close: f64) -> Self {
        Self::new(date, close, close, close, close, 0.0)
    }

    /// High-low range relative to the close. Zero when close is zero.
    pub fn range_pct(&self) -> f64 {
        if self.close == 0.0 {
            0.0
        } else {
            (self.high - self.low) / self.close
        }
    }
}
