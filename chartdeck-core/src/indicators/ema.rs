//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = k * close[t] + (1 - k) * EMA[t-1], k = 2 / (period + 1).
//! Seed: EMA[0] = close[0], not the textbook SMA of the first window.
//! Lookback: 0 (one point per bar).

use super::{round4, Indicator};
use crate::domain::{Bar, Point, Series};

/// EMA of `close`, one point per input bar.
///
/// The recurrence runs on the unrounded state; each emitted value is rounded
/// to 4 places. Charts that hide the warmup apply
/// [`Series::trim_lead_in`] with `period - 1` afterwards.
pub fn ema(bars: &[Bar], period: usize) -> Series {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    bars.iter()
        .zip(ema_values(&closes, period))
        .map(|(bar, value)| Point::new(bar.time, value))
        .collect()
}

/// EMA over an arbitrary value sequence with the first-value seed.
/// Used by MACD for the signal line over the MACD values.
pub(crate) fn ema_values(values: &[f64], period: usize) -> Vec<f64> {
    let k = smoothing_factor(period);
    let mut result = Vec::with_capacity(values.len());
    let mut state = 0.0;

    for (i, &value) in values.iter().enumerate() {
        state = if i == 0 {
            value
        } else {
            value * k + state * (1.0 - k)
        };
        result.push(round4(state));
    }

    result
}

fn smoothing_factor(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Ema {
    type Output = Series;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Series {
        ema(bars, self.period)
    }
}
