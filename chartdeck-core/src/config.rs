//! Serializable chart configuration.
//!
//! A TOML file selects the bar source defaults and which indicators the chart
//! shows with their parameters. Every section is optional; missing fields
//! take the dashboard defaults (SMA/EMA 20, MACD 12/26/9, RSI 14 with 70/30
//! guides, Bollinger 20 x 2).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::DEFAULT_BAR_COUNT;
use crate::domain::{Timeframe, Timestamp};
use crate::indicators::{MacdParams, RsiLevels};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub data: DataConfig,
    pub indicators: IndicatorSettings,
}

impl ChartConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ChartConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.bar_count == 0 {
            return Err(invalid("data.bar_count must be > 0"));
        }
        if self.data.symbol.trim().is_empty() {
            return Err(invalid("data.symbol must not be empty"));
        }
        self.indicators.validate()
    }
}

/// Bar source defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub bar_count: usize,
    pub seed: Option<u64>,
    /// Unix seconds the synthetic history ends at. When absent the history
    /// ends at the start of the current timeframe interval.
    pub end_time: Option<Timestamp>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            symbol: "DEMO".into(),
            timeframe: Timeframe::Minutes(5),
            bar_count: DEFAULT_BAR_COUNT,
            seed: None,
            end_time: None,
        }
    }
}

/// Which indicators the chart shows, with their parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub sma: SmaSettings,
    pub ema: EmaSettings,
    pub macd: MacdSettings,
    pub rsi: RsiSettings,
    pub bollinger: BollingerSettings,
}

impl IndicatorSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sma.period == 0 {
            return Err(invalid("indicators.sma.period must be >= 1"));
        }
        if self.ema.period == 0 {
            return Err(invalid("indicators.ema.period must be >= 1"));
        }
        let macd = &self.macd;
        if macd.fast == 0 || macd.slow == 0 || macd.signal == 0 {
            return Err(invalid("indicators.macd periods must be >= 1"));
        }
        if macd.fast >= macd.slow {
            return Err(invalid(format!(
                "indicators.macd.fast ({}) must be below slow ({})",
                macd.fast, macd.slow
            )));
        }
        let rsi = &self.rsi;
        if rsi.period == 0 {
            return Err(invalid("indicators.rsi.period must be >= 1"));
        }
        if !(0.0..=100.0).contains(&rsi.oversold) || !(0.0..=100.0).contains(&rsi.overbought) {
            return Err(invalid("indicators.rsi levels must lie in 0..=100"));
        }
        if rsi.oversold >= rsi.overbought {
            return Err(invalid(format!(
                "indicators.rsi.oversold ({}) must be below overbought ({})",
                rsi.oversold, rsi.overbought
            )));
        }
        let bb = &self.bollinger;
        if bb.period == 0 {
            return Err(invalid("indicators.bollinger.period must be >= 1"));
        }
        if !bb.multiplier.is_finite() || bb.multiplier <= 0.0 {
            return Err(invalid("indicators.bollinger.multiplier must be a positive number"));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmaSettings {
    pub enabled: bool,
    pub period: usize,
}

impl Default for SmaSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            period: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmaSettings {
    pub enabled: bool,
    pub period: usize,
    /// Hide the first `period - 1` points on the chart.
    pub trim_lead_in: bool,
}

impl Default for EmaSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            period: 20,
            trim_lead_in: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdSettings {
    pub enabled: bool,
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl MacdSettings {
    pub fn params(&self) -> MacdParams {
        MacdParams {
            fast: self.fast,
            slow: self.slow,
            signal: self.signal,
        }
    }
}

impl Default for MacdSettings {
    fn default() -> Self {
        let params = MacdParams::default();
        Self {
            enabled: true,
            fast: params.fast,
            slow: params.slow,
            signal: params.signal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiSettings {
    pub enabled: bool,
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl RsiSettings {
    pub fn levels(&self) -> RsiLevels {
        RsiLevels {
            overbought: self.overbought,
            oversold: self.oversold,
        }
    }
}

impl Default for RsiSettings {
    fn default() -> Self {
        let levels = RsiLevels::default();
        Self {
            enabled: true,
            period: 14,
            overbought: levels.overbought,
            oversold: levels.oversold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerSettings {
    pub enabled: bool,
    pub period: usize,
    pub multiplier: f64,
}

impl Default for BollingerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            period: 20,
            multiplier: 2.0,
        }
    }
}
