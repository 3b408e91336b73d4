//! Bollinger Bands: moving average +/- a multiple of the standard deviation.
//!
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//!
//! Uses population stddev (divide by N). Each window is summed directly.
//! Lookback: period - 1.

use serde::Serialize;

use super::{round4, Indicator};
use crate::domain::{Bar, Point, Series};

/// The three bands, each with `max(0, n - period + 1)` points.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BollingerBands {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

pub fn bollinger_bands(bars: &[Bar], period: usize, multiplier: f64) -> BollingerBands {
    let n = bars.len();
    if period == 0 || n < period {
        return BollingerBands::default();
    }

    let divisor = period as f64;
    let capacity = n - period + 1;
    let mut bands = BollingerBands {
        upper: Series::with_capacity(capacity),
        middle: Series::with_capacity(capacity),
        lower: Series::with_capacity(capacity),
    };

    for (offset, window) in bars.windows(period).enumerate() {
        let time = bars[offset + period - 1].time;
        let mean = window.iter().map(|b| b.close).sum::<f64>() / divisor;
        let variance = window
            .iter()
            .map(|b| {
                let diff = b.close - mean;
                diff * diff
            })
            .sum::<f64>()
            / divisor;
        let width = multiplier * variance.sqrt();

        bands.upper.push(Point::new(time, round4(mean + width)));
        bands.middle.push(Point::new(time, round4(mean)));
        bands.lower.push(Point::new(time, round4(mean - width)));
    }

    bands
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    name: String,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        Self {
            period,
            multiplier,
            name: format!("bollinger_{period}_{multiplier}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl Indicator for Bollinger {
    type Output = BollingerBands;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> BollingerBands {
        bollinger_bands(bars, self.period, self.multiplier)
    }
}
