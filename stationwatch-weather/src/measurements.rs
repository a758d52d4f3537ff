//! Weather Measurements and the Weather Data Subject
//!
//! ## Units
//!
//! The station speaks the units of the classic backyard weather station:
//!
//! ```text
//! Field         Unit    Typical range
//! ------------------------------------
//! temperature   °F      -40 .. 120
//! humidity      % RH    0 .. 100
//! pressure      inHg    28.0 .. 31.0   (29.92 inHg = 1013.25 hPa)
//! ```
//!
//! A [`Measurements`] value is always a complete snapshot. There is no way to
//! publish one field on its own, so observers never see a mix of old and new
//! fields.
//!
//! ## Validation
//!
//! Snapshots are checked before they become the subject's state:
//! - every field must be a finite number
//! - relative humidity cannot leave 0..=100 %
//!
//! Pressure and temperature are not range-limited beyond finiteness; a
//! hurricane-eye reading is still a reading.

use serde::{Deserialize, Serialize};
use stationwatch_core::{NotifyReport, Subject, SubjectResult, Validatable};

/// Minimum valid relative humidity
pub const HUMIDITY_MIN_PERCENT: f32 = 0.0;

/// Maximum valid relative humidity
pub const HUMIDITY_MAX_PERCENT: f32 = 100.0;

/// One complete set of station readings
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurements {
    /// Air temperature in °F
    pub temperature: f32,

    /// Relative humidity in percent
    pub humidity: f32,

    /// Barometric pressure in inHg
    pub pressure: f32,
}

impl Measurements {
    /// Bundle a full set of readings
    pub const fn new(temperature: f32, humidity: f32, pressure: f32) -> Self {
        Self {
            temperature,
            humidity,
            pressure,
        }
    }
}

impl Validatable for Measurements {
    fn is_valid(&self) -> bool {
        self.temperature.is_finite()
            && self.pressure.is_finite()
            && (HUMIDITY_MIN_PERCENT..=HUMIDITY_MAX_PERCENT).contains(&self.humidity)
    }

    fn rejection_reason(&self) -> &'static str {
        if !self.temperature.is_finite() {
            "temperature is not a finite number"
        } else if !self.pressure.is_finite() {
            "pressure is not a finite number"
        } else if !self.humidity.is_finite() {
            "humidity is not a finite number"
        } else {
            "humidity outside 0-100 %"
        }
    }
}

/// The weather station's subject
pub type WeatherData = Subject<Measurements>;

/// Weather-flavoured entry points on [`WeatherData`]
pub trait WeatherStation {
    /// Publish a complete set of readings and notify every display
    fn set_measurements(
        &self,
        temperature: f32,
        humidity: f32,
        pressure: f32,
    ) -> SubjectResult<NotifyReport>;

    /// Current temperature in °F
    fn temperature(&self) -> f32;

    /// Current relative humidity in percent
    fn humidity(&self) -> f32;

    /// Current pressure in inHg
    fn pressure(&self) -> f32;
}

impl WeatherStation for WeatherData {
    fn set_measurements(
        &self,
        temperature: f32,
        humidity: f32,
        pressure: f32,
    ) -> SubjectResult<NotifyReport> {
        self.set_state(Measurements::new(temperature, humidity, pressure))
    }

    fn temperature(&self) -> f32 {
        self.with_state(|m| m.temperature)
    }

    fn humidity(&self) -> f32 {
        self.with_state(|m| m.humidity)
    }

    fn pressure(&self) -> f32 {
        self.with_state(|m| m.pressure)
    }
}
