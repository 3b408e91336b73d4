//! Chart timeframe: the spacing between consecutive bars.
//!
//! String form matches the chart selector: a minute count (`"1"`, `"5"`,
//! `"15"`, `"60"`) or `"D"` for daily bars.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bar::Timestamp;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Timeframe {
    Minutes(u32),
    Daily,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timeframe '{0}': expected a positive minute count or \"D\"")]
pub struct TimeframeError(pub String);

impl Timeframe {
    /// Bar spacing in seconds.
    pub fn seconds(&self) -> i64 {
        match self {
            Timeframe::Minutes(m) => i64::from(*m) * SECONDS_PER_MINUTE,
            Timeframe::Daily => SECONDS_PER_DAY,
        }
    }

    /// Start of the bar interval containing `time` (UTC-aligned).
    pub fn align(&self, time: Timestamp) -> Timestamp {
        time - time.rem_euclid(self.seconds())
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe::Minutes(1)
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("d") {
            return Ok(Timeframe::Daily);
        }
        match trimmed.parse::<u32>() {
            Ok(m) if m > 0 => Ok(Timeframe::Minutes(m)),
            _ => Err(TimeframeError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Timeframe {
    type Error = TimeframeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.to_string()
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Minutes(m) => write!(f, "{m}"),
            Timeframe::Daily => write!(f, "D"),
        }
    }
}
