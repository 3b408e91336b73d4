//! One OHLC sample for a fixed timeframe.

use serde::{Deserialize, Serialize};

/// Unix timestamp in seconds.
pub type Timestamp = i64;

/// OHLC bar for one timeframe interval.
///
/// `time` is the interval open in unix seconds. Within a bar slice, times are
/// strictly increasing and unique; the indicator engine relies on the caller
/// for that and never checks it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: Timestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: u64,
}

impl Bar {
    /// Returns true if every OHLC field is finite.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
    }

    /// Basic OHLC sanity check: finite, high above the body, low below it.
    pub fn is_sane(&self) -> bool {
        if !self.is_finite() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }

    /// Up when the bar closed at or above its open.
    pub fn direction(&self) -> Direction {
        Direction::of(self.close - self.open)
    }
}

/// Binary sign classification used for histogram and volume colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// `Up` for non-negative values, `Down` otherwise.
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}
