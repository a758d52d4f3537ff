//! Barometric Forecast Display
//!
//! ## How the Forecast Works
//!
//! The display remembers exactly two pressures: the one it just read and the
//! one before it. Each notification shifts the window by one:
//!
//! ```text
//! reading        last     current   trend
//! ------------------------------------------------------------------
//! (start)        29.92    29.92
//! 30.10          29.92    30.10     improving
//! 29.50          30.10    29.50     watch out for cooler, rainy weather
//! 29.50          29.50    29.50     more of the same
//! ```
//!
//! Both slots start at the sentinel (29.92 inHg, nominal sea-level pressure
//! by default) so the very first reading always yields a trend.
//!
//! No history beyond that one previous value is kept.

use std::sync::{Arc, Mutex, Weak};

use stationwatch_core::{Observer, ObserverResult};

use super::{attach_new, lock_state, Attachment, DisplayElement, WeatherDisplay};
use crate::config::{ConfigError, ForecastConfig};
use crate::measurements::{WeatherData, WeatherStation};
use crate::sink::RenderSink;
use crate::trend::Trend;

/// The two pressures the forecast compares
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureHistory {
    /// Most recent pressure, inHg
    pub current: f32,
    /// Pressure before the most recent one, inHg
    pub last: f32,
}

impl PressureHistory {
    /// Both slots at the sentinel value
    pub const fn starting_at(initial: f32) -> Self {
        Self {
            current: initial,
            last: initial,
        }
    }

    /// Shift in a new reading
    fn push(&mut self, pressure: f32) {
        self.last = self.current;
        self.current = pressure;
    }
}

/// Derives a weather trend from consecutive pressure readings
pub struct ForecastDisplay {
    attachment: Attachment,
    sink: Arc<dyn RenderSink>,
    tolerance: f32,
    pressure: Mutex<PressureHistory>,
}

impl ForecastDisplay {
    /// Name used for sink output and failure reports
    pub const NAME: &'static str = "forecast";

    /// Build with default settings; not yet attached
    pub fn new(subject: &Arc<WeatherData>, sink: Arc<dyn RenderSink>) -> Self {
        Self::build(Attachment::new(subject), sink, &ForecastConfig::default())
    }

    /// Build with explicit settings; not yet attached
    ///
    /// The config is checked first, so a NaN sentinel or a negative tolerance
    /// never reaches the trend.
    pub fn with_config(
        subject: &Arc<WeatherData>,
        sink: Arc<dyn RenderSink>,
        config: &ForecastConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(Attachment::new(subject), sink, config))
    }

    /// Build from a weak subject reference, failing if it is already gone
    pub fn from_weak(
        subject: Weak<WeatherData>,
        sink: Arc<dyn RenderSink>,
    ) -> ObserverResult<Self> {
        Ok(Self::build(Attachment::from_weak(subject)?, sink, &ForecastConfig::default()))
    }

    /// Build and register in one step
    pub fn attached(subject: &Arc<WeatherData>, sink: Arc<dyn RenderSink>) -> Arc<Self> {
        attach_new(subject, Self::new(subject, sink))
    }

    fn build(attachment: Attachment, sink: Arc<dyn RenderSink>, config: &ForecastConfig) -> Self {
        Self {
            attachment,
            sink,
            tolerance: config.steady_tolerance,
            pressure: Mutex::new(PressureHistory::starting_at(config.initial_pressure)),
        }
    }

    /// Current and previous pressure
    pub fn history(&self) -> ObserverResult<PressureHistory> {
        Ok(*lock_state(&self.pressure, "forecast pressure")?)
    }

    /// Trend between the two remembered pressures
    pub fn trend(&self) -> ObserverResult<Trend> {
        let history = self.history()?;
        Ok(Trend::within(history.current, history.last, self.tolerance))
    }
}

impl DisplayElement for ForecastDisplay {
    fn render(&self) -> ObserverResult<String> {
        Ok(format!("Forecast: {}", self.trend()?))
    }
}

impl Observer for ForecastDisplay {
    fn update(&self) -> ObserverResult<()> {
        let pressure = self.attachment.subject()?.pressure();
        lock_state(&self.pressure, "forecast pressure")?.push(pressure);

        let line = self.render()?;
        self.sink.emit(Self::NAME, &line);
        Ok(())
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

impl WeatherDisplay for ForecastDisplay {
    fn attachment(&self) -> &Attachment {
        &self.attachment
    }
}
