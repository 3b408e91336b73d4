//! Relative Strength Index (RSI).
//!
//! One entry per bar:
//! - bar 0: undefined (no previous close)
//! - bars 1..period: gains and losses are summed, output undefined
//! - bar `period`: RSI from the unsmoothed sums
//! - after that: Wilder smoothing, avg = (avg * (period - 1) + x) / period
//!
//! RSI = 100 - 100 / (1 + gains / losses), with a zero loss replaced by
//! [`RSI_EPSILON`]. All-gain windows therefore approach 100 without the
//! formula itself reaching it.
//! Lookback: period.

use serde::{Deserialize, Serialize};

use super::{round4, Indicator};
use crate::domain::{Bar, Point, Series};

/// Substituted for a zero loss sum.
pub const RSI_EPSILON: f64 = 1e-8;

/// RSI series with one entry per bar. `period == 0` leaves every entry
/// undefined.
pub fn rsi(bars: &[Bar], period: usize) -> Series {
    let mut result = Series::with_capacity(bars.len());
    let Some(first) = bars.first() else {
        return result;
    };
    result.push(Point::undefined(first.time));

    if period == 0 {
        result.extend(bars[1..].iter().map(|b| Point::undefined(b.time)));
        return result;
    }

    let divisor = period as f64;
    let mut gains = 0.0;
    let mut losses = 0.0;

    for (i, pair) in bars.windows(2).enumerate() {
        let i = i + 1;
        let change = pair[1].close - pair[0].close;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if i <= period {
            gains += gain;
            losses += loss;
            if i == period {
                result.push(Point::new(pair[1].time, strength_index(gains, losses)));
            } else {
                result.push(Point::undefined(pair[1].time));
            }
        } else {
            gains = (gains * (divisor - 1.0) + gain) / divisor;
            losses = (losses * (divisor - 1.0) + loss) / divisor;
            result.push(Point::new(pair[1].time, strength_index(gains, losses)));
        }
    }

    result
}

fn strength_index(gains: f64, losses: f64) -> f64 {
    let losses = if losses == 0.0 { RSI_EPSILON } else { losses };
    round4(100.0 - 100.0 / (1.0 + gains / losses))
}

/// Overbought/oversold guide levels drawn on the RSI panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiLevels {
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RsiLevels {
    fn default() -> Self {
        Self {
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiZone {
    Overbought,
    Neutral,
    Oversold,
}

impl RsiLevels {
    /// Levels are inclusive: a value equal to `overbought` is overbought.
    pub fn classify(&self, value: f64) -> RsiZone {
        if value >= self.overbought {
            RsiZone::Overbought
        } else if value <= self.oversold {
            RsiZone::Oversold
        } else {
            RsiZone::Neutral
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Rsi {
    type Output = Series;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Series {
        rsi(bars, self.period)
    }
}
