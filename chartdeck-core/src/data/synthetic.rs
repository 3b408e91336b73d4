//! Synthetic bar generation.
//!
//! A random walk from 100.0 with OHLC rounded to cents, the same shape as the
//! dashboard's demo feed: each bar opens at the previous close, moves by a
//! random step, and gets a random wick on each side. Output is deterministic
//! for a given seed; without an explicit seed the symbol name is hashed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::provider::{BarSource, DataError, DataSource};
use crate::domain::{Bar, Timeframe, Timestamp};
use crate::indicators::round_decimal;

pub const DEFAULT_BAR_COUNT: usize = 500;

const START_PRICE: f64 = 100.0;
const MIN_CLOSE: f64 = 0.1;

/// Parameters for one synthetic bar history.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticSource {
    pub symbol: String,
    pub count: usize,
    pub timeframe: Timeframe,
    /// The last bar opens one timeframe before this instant.
    pub end_time: Timestamp,
    pub seed: Option<u64>,
}

impl SyntheticSource {
    /// Default count, ending at the start of the current timeframe interval.
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            count: DEFAULT_BAR_COUNT,
            timeframe,
            end_time: timeframe.align(chrono::Utc::now().timestamp()),
            seed: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_end_time(mut self, end_time: Timestamp) -> Self {
        self.end_time = end_time;
        self
    }

    /// Explicit seed, or one derived from the symbol.
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| symbol_seed(&self.symbol))
    }
}

/// Generate `count` bars spaced by the timeframe, the first at
/// `end_time - count * timeframe`.
pub fn generate_bars(params: &SyntheticSource) -> Vec<Bar> {
    let seed = params.effective_seed();
    let mut rng = StdRng::seed_from_u64(seed);
    let step = params.timeframe.seconds();

    let mut bars = Vec::with_capacity(params.count);
    let mut time = params.end_time - params.count as i64 * step;
    let mut price = START_PRICE;

    for _ in 0..params.count {
        let open = price;
        let change = (rng.gen::<f64>() - 0.5) * 2.0 * (rng.gen::<f64>() * 1.5 + 0.2);
        let close = round2(open + change).max(MIN_CLOSE);
        let high = open.max(close) + round2(rng.gen::<f64>() * 1.2);
        let low = open.min(close) - round2(rng.gen::<f64>() * 1.2);
        let volume = (100.0 + rng.gen::<f64>() * 900.0).round() as u64;

        bars.push(Bar {
            time,
            open: round2(open),
            high: round2(high),
            low: round2(low),
            close,
            volume,
        });

        price = close;
        time += step;
    }

    debug!(
        symbol = %params.symbol,
        count = params.count,
        timeframe = %params.timeframe,
        seed,
        "generated synthetic bars"
    );
    bars
}

fn symbol_seed(symbol: &str) -> u64 {
    let hash = blake3::hash(symbol.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

fn round2(value: f64) -> f64 {
    round_decimal(value, 100.0)
}

impl BarSource for SyntheticSource {
    fn name(&self) -> String {
        format!("synthetic:{}@{}", self.symbol, self.timeframe)
    }

    fn kind(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn load(&self) -> Result<Vec<Bar>, DataError> {
        if self.count == 0 {
            return Err(DataError::Empty(self.name()));
        }
        Ok(generate_bars(self))
    }
}
