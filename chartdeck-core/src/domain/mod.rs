//! Domain types for ChartDeck

pub mod bar;
pub mod series;
pub mod timeframe;

pub use bar::{Bar, Direction, Timestamp};
pub use series::{HistogramPoint, Point, Series, TimeBounds};
pub use timeframe::{Timeframe, TimeframeError};
