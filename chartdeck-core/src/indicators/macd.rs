//! Moving Average Convergence-Divergence (MACD).
//!
//! line   = round4(EMA(fast) - EMA(slow)), index-aligned
//! signal = EMA(signal) over the rounded line values
//! hist   = round4(line - signal)
//!
//! All EMAs use the first-value seed, so the three outputs have one entry per
//! bar with no lead-in gap.

use serde::{Deserialize, Serialize};

use super::ema::ema_values;
use super::{round4, Indicator};
use crate::domain::{Bar, HistogramPoint, Point, Series};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// MACD output: line, signal line and histogram, each one entry per bar.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MacdSeries {
    pub macd: Series,
    pub signal: Series,
    pub hist: Vec<HistogramPoint>,
}

pub fn macd(bars: &[Bar], params: MacdParams) -> MacdSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let fast = ema_values(&closes, params.fast);
    let slow = ema_values(&closes, params.slow);

    let line: Vec<f64> = fast
        .iter()
        .zip(&slow)
        .map(|(f, s)| round4(f - s))
        .collect();
    let signal = ema_values(&line, params.signal);

    let mut out = MacdSeries {
        macd: Series::with_capacity(bars.len()),
        signal: Series::with_capacity(bars.len()),
        hist: Vec::with_capacity(bars.len()),
    };
    for ((bar, &m), &s) in bars.iter().zip(&line).zip(&signal) {
        out.macd.push(Point::new(bar.time, m));
        out.signal.push(Point::new(bar.time, s));
        out.hist.push(HistogramPoint {
            time: bar.time,
            value: round4(m - s),
        });
    }

    out
}

#[derive(Debug, Clone)]
pub struct Macd {
    params: MacdParams,
    name: String,
}

impl Macd {
    pub fn new(params: MacdParams) -> Self {
        assert!(
            params.fast >= 1 && params.slow >= 1 && params.signal >= 1,
            "MACD periods must be >= 1"
        );
        Self {
            params,
            name: format!("macd_{}_{}_{}", params.fast, params.slow, params.signal),
        }
    }

    pub fn params(&self) -> MacdParams {
        self.params
    }
}

impl Indicator for Macd {
    type Output = MacdSeries;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> MacdSeries {
        macd(bars, self.params)
    }
}
