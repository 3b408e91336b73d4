//! Indicator engine.
//!
//! Every indicator is a pure function: bar slice in, freshly allocated series
//! out. No state survives between calls and degenerate input (no bars, a
//! period longer than the data) yields empty or `None`-padded output rather
//! than an error.
//!
//! Each stage rounds its output to 4 decimal places, and chained stages (MACD
//! line, signal, histogram) consume the rounded values of the stage before.
//!
//! The free functions ([`sma`], [`ema`], [`macd`], [`rsi`],
//! [`bollinger_bands`]) are the canonical entry points. The parameter structs
//! implementing [`Indicator`] wrap them for code that handles indicators
//! generically.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{bollinger_bands, Bollinger, BollingerBands};
pub use ema::{ema, Ema};
pub use macd::{macd, Macd, MacdParams, MacdSeries};
pub use rsi::{rsi, Rsi, RsiLevels, RsiZone, RSI_EPSILON};
pub use sma::{sma, Sma};

use crate::domain::Bar;

/// An indicator with fixed parameters.
///
/// `compute` must be a pure function of `bars`: no value at bar `t` may
/// depend on bars after `t`, and two calls on the same input return
/// identical output.
pub trait Indicator: Send + Sync {
    type Output;

    /// Human-readable name (e.g., "sma_20", "macd_12_26_9").
    fn name(&self) -> &str;

    /// Number of leading bars without a defined value.
    fn lookback(&self) -> usize;

    fn compute(&self, bars: &[Bar]) -> Self::Output;
}

/// Round to 4 decimal places, half away from zero.
///
/// Ties are decided on the exact binary value, so `11.43225` (stored as
/// `11.432249999...`) rounds down to `11.4322`.
#[inline]
pub fn round4(value: f64) -> f64 {
    round_decimal(value, 10_000.0)
}

/// Round `value` to the nearest multiple of `1 / scale`, half away from
/// zero, judged on the exact value of the double rather than the rounded
/// product `value * scale`.
pub(crate) fn round_decimal(value: f64, scale: f64) -> f64 {
    let scaled = value * scale;
    let mut rounded = scaled.round();
    if (scaled - scaled.trunc()).abs() == 0.5 {
        // Exact residual of the product: the true scaled value is
        // `scaled + residual`.
        let residual = value.mul_add(scale, -scaled);
        if residual != 0.0 && (residual > 0.0) != (scaled > 0.0) {
            rounded = scaled.trunc();
        }
    }
    rounded / scale
}

/// Create synthetic bars from close prices for testing.
///
/// open = prev_close (or close for first bar), high/low one unit outside the
/// body, one bar per minute from a fixed base time.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    const BASE_TIME: i64 = 1_704_153_600;
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                time: BASE_TIME + i as i64 * 60,
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-9;
