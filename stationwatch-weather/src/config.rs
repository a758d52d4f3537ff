//! Station Configuration
//!
//! Plain serde structs with defaults for every field, so a config file only
//! has to name what it changes:
//!
//! ```json
//! {
//!   "notify_policy": "fail_fast",
//!   "forecast": { "initial_pressure": 30.0, "steady_tolerance": 0.01 }
//! }
//! ```
//!
//! | Field                          | Default     | Meaning                                  |
//! |--------------------------------|-------------|------------------------------------------|
//! | `notify_policy`                | `isolate`   | failing display: log and continue, or abort |
//! | `forecast.initial_pressure`    | `29.92`     | sentinel the first reading is compared to |
//! | `forecast.steady_tolerance`    | `0.0`       | largest change still reported as steady   |

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stationwatch_core::{NotifyPolicy, Subject};
use thiserror::Error;

use crate::measurements::{Measurements, WeatherData};

/// Nominal sea-level pressure in inHg, the forecast's starting point
pub const DEFAULT_INITIAL_PRESSURE: f32 = 29.92;

/// Errors loading or checking a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config text is not valid JSON for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but makes no sense
    #[error("Invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}

/// Forecast display settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Pressure the first reading is compared against, in inHg
    pub initial_pressure: f32,

    /// Largest pressure change still reported as steady, in inHg
    pub steady_tolerance: f32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            initial_pressure: DEFAULT_INITIAL_PRESSURE,
            // Exact comparison unless asked otherwise
            steady_tolerance: 0.0,
        }
    }
}

impl ForecastConfig {
    /// Check the sentinel and tolerance are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.initial_pressure.is_finite() || self.initial_pressure <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "forecast.initial_pressure",
                reason: "must be a positive number",
            });
        }

        if !self.steady_tolerance.is_finite() || self.steady_tolerance < 0.0 {
            return Err(ConfigError::Invalid {
                field: "forecast.steady_tolerance",
                reason: "must be zero or a positive number",
            });
        }

        Ok(())
    }
}

/// Top-level station configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// What a notification pass does when a display fails
    pub notify_policy: NotifyPolicy,

    /// Forecast display settings
    pub forecast: ForecastConfig,
}

impl StationConfig {
    /// Parse and check a JSON config
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and check a JSON config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.forecast.validate()
    }

    /// Fresh weather subject using this config's notification policy
    pub fn build_weather_data(&self) -> Arc<WeatherData> {
        Arc::new(Subject::with_policy(Measurements::default(), self.notify_policy))
    }
}
