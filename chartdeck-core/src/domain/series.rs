//! Derived value series, the output shape of every indicator.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::bar::{Direction, Timestamp};

/// One sample of a derived series. `value` is `None` where the formula is
/// not yet defined (e.g. the RSI seeding window).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub time: Timestamp,
    pub value: Option<f64>,
}

impl Point {
    pub fn new(time: Timestamp, value: f64) -> Self {
        Self {
            time,
            value: Some(value),
        }
    }

    pub fn undefined(time: Timestamp) -> Self {
        Self { time, value: None }
    }
}

/// First and last timestamp of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub min: Timestamp,
    pub max: Timestamp,
}

/// Time-ordered sequence of [`Point`]s with no duplicate timestamps.
///
/// A series has no identity beyond its values: indicators build a fresh one
/// on every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series(Vec<Point>);

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn push(&mut self, point: Point) {
        self.0.push(point);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.0.iter()
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    /// Values in order, `None` where undefined.
    pub fn values(&self) -> Vec<Option<f64>> {
        self.0.iter().map(|p| p.value).collect()
    }

    /// Value at an exact timestamp. `None` if no point has that time or the
    /// point is undefined.
    pub fn value_at(&self, time: Timestamp) -> Option<f64> {
        self.0
            .binary_search_by_key(&time, |p| p.time)
            .ok()
            .and_then(|i| self.0[i].value)
    }

    pub fn time_bounds(&self) -> Option<TimeBounds> {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => Some(TimeBounds {
                min: first.time,
                max: last.time,
            }),
            _ => None,
        }
    }

    /// Drops the first `n` points.
    ///
    /// Display policy for series that emit from the first bar (EMA), where the
    /// chart hides the `period - 1` warmup points.
    pub fn trim_lead_in(mut self, n: usize) -> Self {
        let n = n.min(self.0.len());
        self.0.drain(..n);
        self
    }

    pub fn into_vec(self) -> Vec<Point> {
        self.0
    }
}

impl From<Vec<Point>> for Series {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

impl FromIterator<Point> for Series {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Point> for Series {
    fn extend<I: IntoIterator<Item = Point>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Histogram sample (MACD histogram). The up/down classification is derived
/// from the sign of `value`, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct HistogramPoint {
    pub time: Timestamp,
    pub value: f64,
}

impl HistogramPoint {
    pub fn direction(&self) -> Direction {
        Direction::of(self.value)
    }
}

impl Serialize for HistogramPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("HistogramPoint", 3)?;
        state.serialize_field("time", &self.time)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("direction", &self.direction())?;
        state.end()
    }
}
