//! Chart context: the bars on screen plus everything derived from them.
//!
//! `ChartContext` owns one bar history and a time index over it. A
//! [`ChartSnapshot`] is built from the context and a set of
//! [`IndicatorSettings`]; it holds every enabled series and is what gets
//! serialized for a renderer. Crosshair lookups read values back out of a
//! snapshot by timestamp.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::config::IndicatorSettings;
use crate::domain::{
    Bar, Direction, HistogramPoint, Point, Series, TimeBounds, Timeframe, Timestamp,
};
use crate::indicators::{
    bollinger_bands, ema, macd, rsi, sma, BollingerBands, MacdSeries, RsiLevels, RsiZone,
};

/// One bar's volume, coloured by the bar's direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeBar {
    pub time: Timestamp,
    pub value: u64,
    pub direction: Direction,
}

/// RSI series with the constant guide lines drawn over it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RsiPanel {
    pub series: Series,
    pub levels: RsiLevels,
    pub overbought: Series,
    pub oversold: Series,
}

/// Every series the chart shows for one bar history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSnapshot {
    pub timeframe: Timeframe,
    pub bounds: Option<TimeBounds>,
    pub candles: Vec<Bar>,
    pub volume: Vec<VolumeBar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma: Option<Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema: Option<Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<RsiPanel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger: Option<BollingerBands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdReadout {
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub hist: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandReadout {
    pub upper: Option<f64>,
    pub middle: Option<f64>,
    pub lower: Option<f64>,
}

/// Values under the crosshair at one bar time.
///
/// Indicator fields are `None` when the indicator is disabled or has no
/// value at that time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrosshairReadout {
    pub time: Timestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub sma: Option<f64>,
    pub ema: Option<f64>,
    pub macd: Option<MacdReadout>,
    pub rsi: Option<f64>,
    pub rsi_zone: Option<RsiZone>,
    pub bollinger: Option<BandReadout>,
}

/// Bars for one symbol and timeframe, indexed by time.
#[derive(Debug, Clone, Default)]
pub struct ChartContext {
    bars: Vec<Bar>,
    timeframe: Timeframe,
    index: BTreeMap<Timestamp, usize>,
}

impl ChartContext {
    /// `bars` must be ascending by time with unique timestamps.
    pub fn new(bars: Vec<Bar>, timeframe: Timeframe) -> Self {
        let index = build_index(&bars);
        Self {
            bars,
            timeframe,
            index,
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The bar opening exactly at `time`.
    pub fn bar_at(&self, time: Timestamp) -> Option<&Bar> {
        self.index.get(&time).map(|&i| &self.bars[i])
    }

    pub fn time_bounds(&self) -> Option<TimeBounds> {
        let first = self.bars.first()?;
        let last = self.bars.last()?;
        Some(TimeBounds {
            min: first.time,
            max: last.time,
        })
    }

    /// Swap in a new history, e.g. after a symbol or timeframe change.
    pub fn replace_bars(&mut self, bars: Vec<Bar>, timeframe: Timeframe) {
        self.index = build_index(&bars);
        self.bars = bars;
        self.timeframe = timeframe;
    }

    pub fn volume(&self) -> Vec<VolumeBar> {
        self.bars
            .iter()
            .map(|bar| VolumeBar {
                time: bar.time,
                value: bar.volume,
                direction: bar.direction(),
            })
            .collect()
    }

    /// Compute every enabled indicator over the current bars.
    pub fn snapshot(&self, settings: &IndicatorSettings) -> ChartSnapshot {
        let bars = self.bars.as_slice();

        let sma = settings.sma.enabled.then(|| sma(bars, settings.sma.period));
        let ema = settings.ema.enabled.then(|| {
            let series = ema(bars, settings.ema.period);
            if settings.ema.trim_lead_in {
                series.trim_lead_in(settings.ema.period.saturating_sub(1))
            } else {
                series
            }
        });
        let macd = settings.macd.enabled.then(|| macd(bars, settings.macd.params()));
        let rsi = settings.rsi.enabled.then(|| {
            let levels = settings.rsi.levels();
            RsiPanel {
                series: rsi(bars, settings.rsi.period),
                levels,
                overbought: guide_line(bars, levels.overbought),
                oversold: guide_line(bars, levels.oversold),
            }
        });
        let bollinger = settings.bollinger.enabled.then(|| {
            bollinger_bands(bars, settings.bollinger.period, settings.bollinger.multiplier)
        });

        debug!(
            bars = bars.len(),
            timeframe = %self.timeframe,
            sma = sma.is_some(),
            ema = ema.is_some(),
            macd = macd.is_some(),
            rsi = rsi.is_some(),
            bollinger = bollinger.is_some(),
            "built chart snapshot"
        );

        ChartSnapshot {
            timeframe: self.timeframe,
            bounds: self.time_bounds(),
            candles: self.bars.clone(),
            volume: self.volume(),
            sma,
            ema,
            macd,
            rsi,
            bollinger,
        }
    }

    /// Crosshair values at `time`, or `None` when no bar opens there.
    pub fn readout(&self, time: Timestamp, snapshot: &ChartSnapshot) -> Option<CrosshairReadout> {
        let bar = self.bar_at(time)?;

        let macd = snapshot.macd.as_ref().map(|m| MacdReadout {
            macd: m.macd.value_at(time),
            signal: m.signal.value_at(time),
            hist: histogram_at(&m.hist, time),
        });
        let rsi = snapshot.rsi.as_ref().and_then(|panel| panel.series.value_at(time));
        let rsi_zone = snapshot.rsi.as_ref().and_then(|panel| {
            panel
                .series
                .value_at(time)
                .map(|value| panel.levels.classify(value))
        });
        let bollinger = snapshot.bollinger.as_ref().map(|bands| BandReadout {
            upper: bands.upper.value_at(time),
            middle: bands.middle.value_at(time),
            lower: bands.lower.value_at(time),
        });

        Some(CrosshairReadout {
            time,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            sma: snapshot.sma.as_ref().and_then(|s| s.value_at(time)),
            ema: snapshot.ema.as_ref().and_then(|s| s.value_at(time)),
            macd,
            rsi,
            rsi_zone,
            bollinger,
        })
    }
}

fn build_index(bars: &[Bar]) -> BTreeMap<Timestamp, usize> {
    bars.iter().enumerate().map(|(i, bar)| (bar.time, i)).collect()
}

fn guide_line(bars: &[Bar], level: f64) -> Series {
    bars.iter().map(|bar| Point::new(bar.time, level)).collect()
}

fn histogram_at(hist: &[HistogramPoint], time: Timestamp) -> Option<f64> {
    hist.binary_search_by_key(&time, |p| p.time)
        .ok()
        .map(|i| hist[i].value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{make_bars, round4};

    fn context(closes: &[f64]) -> ChartContext {
        ChartContext::new(make_bars(closes), Timeframe::Minutes(1))
    }

    fn closes(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.7).sin() * 3.0).collect()
    }

    fn all_enabled() -> IndicatorSettings {
        let mut settings = IndicatorSettings::default();
        settings.bollinger.enabled = true;
        settings
    }

    #[test]
    fn bar_lookup_by_time() {
        let ctx = context(&[1.0, 2.0, 3.0]);
        let t1 = ctx.bars()[1].time;
        assert_eq!(ctx.bar_at(t1).map(|b| b.close), Some(2.0));
        assert!(ctx.bar_at(t1 + 1).is_none());
    }

    #[test]
    fn time_bounds_span_bars() {
        let ctx = context(&[1.0, 2.0, 3.0]);
        let bounds = ctx.time_bounds().unwrap();
        assert_eq!(bounds.min, ctx.bars()[0].time);
        assert_eq!(bounds.max, ctx.bars()[2].time);
        assert!(ChartContext::default().time_bounds().is_none());
    }

    #[test]
    fn volume_follows_bar_direction() {
        let mut bars = make_bars(&[10.0, 11.0]);
        bars[0].open = 10.5;
        bars[0].volume = 300;
        bars[1].open = 10.0;
        let ctx = ChartContext::new(bars, Timeframe::Minutes(1));
        let volume = ctx.volume();
        assert_eq!(volume[0].direction, Direction::Down);
        assert_eq!(volume[0].value, 300);
        assert_eq!(volume[1].direction, Direction::Up);
    }

    #[test]
    fn default_snapshot_skips_bollinger() {
        let ctx = context(&closes(60));
        let snap = ctx.snapshot(&IndicatorSettings::default());
        assert!(snap.sma.is_some());
        assert!(snap.ema.is_some());
        assert!(snap.macd.is_some());
        assert!(snap.rsi.is_some());
        assert!(snap.bollinger.is_none());
        assert_eq!(snap.candles.len(), 60);
        assert_eq!(snap.volume.len(), 60);
    }

    #[test]
    fn disabled_indicators_are_absent() {
        let mut settings = IndicatorSettings::default();
        settings.sma.enabled = false;
        settings.macd.enabled = false;
        let snap = context(&closes(30)).snapshot(&settings);
        assert!(snap.sma.is_none());
        assert!(snap.macd.is_none());

        let json = serde_json::to_value(&snap).unwrap();
        assert!(json.get("sma").is_none());
        assert!(json.get("ema").is_some());
    }

    #[test]
    fn ema_lead_in_trim() {
        let ctx = context(&closes(40));
        let mut settings = IndicatorSettings::default();
        let trimmed = ctx.snapshot(&settings).ema.unwrap();
        assert_eq!(trimmed.len(), 40 - 19);

        settings.ema.trim_lead_in = false;
        let full = ctx.snapshot(&settings).ema.unwrap();
        assert_eq!(full.len(), 40);
        assert_eq!(full.last(), trimmed.last());
    }

    #[test]
    fn rsi_panel_has_guide_lines() {
        let ctx = context(&closes(30));
        let panel = ctx.snapshot(&IndicatorSettings::default()).rsi.unwrap();
        assert_eq!(panel.series.len(), 30);
        assert_eq!(panel.overbought.len(), 30);
        assert!(panel.overbought.iter().all(|p| p.value == Some(70.0)));
        assert!(panel.oversold.iter().all(|p| p.value == Some(30.0)));
    }

    #[test]
    fn readout_collects_all_series() {
        let ctx = context(&closes(60));
        let snap = ctx.snapshot(&all_enabled());
        let last = ctx.bars()[59];
        let readout = ctx.readout(last.time, &snap).unwrap();

        assert_eq!(readout.close, last.close);
        assert_eq!(readout.sma, snap.sma.as_ref().unwrap().last().unwrap().value);
        assert!(readout.ema.is_some());
        assert!(readout.rsi.is_some());
        assert!(readout.rsi_zone.is_some());

        let macd = readout.macd.unwrap();
        let (m, s, h) = (macd.macd.unwrap(), macd.signal.unwrap(), macd.hist.unwrap());
        assert_eq!(h, round4(m - s));

        let bands = readout.bollinger.unwrap();
        assert!(bands.upper.unwrap() >= bands.lower.unwrap());
    }

    #[test]
    fn readout_in_lead_in_has_no_values() {
        let ctx = context(&closes(30));
        let snap = ctx.snapshot(&all_enabled());
        let first = ctx.bars()[0].time;
        let readout = ctx.readout(first, &snap).unwrap();
        assert!(readout.sma.is_none());
        assert!(readout.rsi.is_none());
        assert!(readout.rsi_zone.is_none());
        assert!(readout.bollinger.unwrap().upper.is_none());
        assert_eq!(readout.macd.unwrap().macd, Some(0.0));
    }

    #[test]
    fn readout_unknown_time_is_none() {
        let ctx = context(&closes(10));
        let snap = ctx.snapshot(&IndicatorSettings::default());
        assert!(ctx.readout(0, &snap).is_none());
    }

    #[test]
    fn replace_bars_rebuilds_index() {
        let mut ctx = context(&[1.0, 2.0]);
        let old = ctx.bars()[0].time;
        let mut bars = make_bars(&[5.0]);
        bars[0].time = old + 10_000;
        ctx.replace_bars(bars, Timeframe::Daily);
        assert!(ctx.bar_at(old).is_none());
        assert_eq!(ctx.bar_at(old + 10_000).map(|b| b.close), Some(5.0));
        assert_eq!(ctx.timeframe(), Timeframe::Daily);
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn empty_context_snapshot() {
        let snap = ChartContext::default().snapshot(&all_enabled());
        assert!(snap.candles.is_empty());
        assert!(snap.bounds.is_none());
        assert!(snap.sma.unwrap().is_empty());
        assert!(snap.macd.unwrap().hist.is_empty());
    }

    #[test]
    fn snapshot_json_has_directions() {
        let snap = context(&closes(30)).snapshot(&IndicatorSettings::default());
        let json = serde_json::to_value(&snap).unwrap();
        let dir = &json["volume"][0]["direction"];
        assert!(dir == "up" || dir == "down");
        let hist_dir = &json["macd"]["hist"][0]["direction"];
        assert!(hist_dir == "up" || hist_dir == "down");
        assert_eq!(json["timeframe"], "1");
    }
}
