//! ChartDeck Core: indicator engine, bar sources and chart context for a
//! candlestick dashboard.
//!
//! This crate contains:
//! - Domain types (bars, derived series, histogram points, timeframes)
//! - Pure indicator functions (SMA, EMA, MACD, RSI, Bollinger Bands)
//! - Bar sources (CSV import/export, deterministic synthetic random walk)
//! - TOML chart configuration
//! - Chart context with snapshot and crosshair readout

pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: domain and output types are Send + Sync so a
    /// snapshot can be built on a worker thread and handed to a renderer.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Series>();
        require_sync::<domain::Series>();
        require_send::<domain::HistogramPoint>();
        require_sync::<domain::HistogramPoint>();
        require_send::<domain::Timeframe>();
        require_sync::<domain::Timeframe>();

        // Indicator outputs
        require_send::<indicators::MacdSeries>();
        require_sync::<indicators::MacdSeries>();
        require_send::<indicators::BollingerBands>();
        require_sync::<indicators::BollingerBands>();

        // Chart types
        require_send::<chart::ChartContext>();
        require_sync::<chart::ChartContext>();
        require_send::<chart::ChartSnapshot>();
        require_sync::<chart::ChartSnapshot>();
        require_send::<chart::CrosshairReadout>();
        require_sync::<chart::CrosshairReadout>();

        // Config
        require_send::<config::ChartConfig>();
        require_sync::<config::ChartConfig>();
    }

    /// Indicators can be driven through trait objects.
    #[test]
    fn indicators_are_object_safe() {
        use indicators::{Ema, Indicator, Rsi, Sma};

        let boxed: Vec<Box<dyn Indicator<Output = domain::Series>>> = vec![
            Box::new(Sma::new(3)),
            Box::new(Ema::new(3)),
            Box::new(Rsi::new(3)),
        ];
        let names: Vec<&str> = boxed.iter().map(|i| i.name()).collect();
        assert_eq!(names, ["sma_3", "ema_3", "rsi_3"]);
        assert_eq!(boxed[0].lookback(), 2);
        assert!(boxed.iter().all(|i| i.compute(&[]).is_empty()));
    }
}
