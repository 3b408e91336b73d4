//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a trailing window.
//! Lookback: period - 1 (first point aligned with bar period-1).

use super::{round4, Indicator};
use crate::domain::{Bar, Point, Series};

/// SMA of `close` over `period` bars.
///
/// Emits `max(0, n - period + 1)` points. A running sum is rolled forward
/// instead of re-summing each window. `period == 0` or `period > n` gives an
/// empty series.
pub fn sma(bars: &[Bar], period: usize) -> Series {
    let n = bars.len();
    if period == 0 || n < period {
        return Series::new();
    }

    let divisor = period as f64;
    let mut result = Series::with_capacity(n - period + 1);
    let mut sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        sum += bar.close;
        if i >= period {
            sum -= bars[i - period].close;
        }
        if i + 1 >= period {
            result.push(Point::new(bar.time, round4(sum / divisor)));
        }
    }

    result
}

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    type Output = Series;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Series {
        sma(bars, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn sma_3_basic() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let result = sma(&bars, 3);

        assert_eq!(result.len(), 3);
        assert_eq!(result.values(), vec![Some(2.0), Some(3.0), Some(4.0)]);
        // First point aligns with bar index 2
        assert_eq!(result.points()[0].time, bars[2].time);
        assert_eq!(result.last().map(|p| p.time), Some(bars[4].time));
    }

    #[test]
    fn sma_5_rolls_window() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0]);
        let result = sma(&bars, 5);
        // mean(10..=14) = 12, mean(11..=15) = 13, mean(12..=16) = 14
        assert_eq!(result.values(), vec![Some(12.0), Some(13.0), Some(14.0)]);
    }

    #[test]
    fn sma_1_is_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let result = sma(&bars, 1);
        assert_eq!(result.len(), 3);
        for (point, bar) in result.iter().zip(&bars) {
            assert_eq!(point.time, bar.time);
            assert_eq!(point.value, Some(bar.close));
        }
    }

    #[test]
    fn sma_rounds_to_4_places() {
        let bars = make_bars(&[1.0, 1.0, 2.0]);
        let result = sma(&bars, 3);
        // 4/3 = 1.33333...
        assert_approx(result.points()[0].value.unwrap(), 1.3333, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_too_few_bars_is_empty() {
        let bars = make_bars(&[10.0, 11.0]);
        assert!(sma(&bars, 5).is_empty());
        assert!(sma(&[], 3).is_empty());
    }

    #[test]
    fn sma_zero_period_is_empty() {
        let bars = make_bars(&[10.0, 11.0]);
        assert!(sma(&bars, 0).is_empty());
    }

    #[test]
    fn sma_period_equals_len() {
        let bars = make_bars(&[2.0, 4.0, 6.0]);
        let result = sma(&bars, 3);
        assert_eq!(result.values(), vec![Some(4.0)]);
    }

    #[test]
    fn sma_indicator_wrapper() {
        let ind = Sma::new(20);
        assert_eq!(ind.name(), "sma_20");
        assert_eq!(ind.lookback(), 19);
        assert_eq!(Sma::new(1).lookback(), 0);

        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(Sma::new(3).compute(&bars), sma(&bars, 3));
    }

    #[test]
    #[should_panic(expected = "SMA period must be >= 1")]
    fn sma_wrapper_rejects_zero() {
        let _ = Sma::new(0);
    }
}
