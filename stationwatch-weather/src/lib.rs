//! Weather station built on the StationWatch notification core
//!
//! A [`WeatherData`] subject holds the latest temperature, humidity and
//! pressure. Displays attach to it and re-render every time a new set of
//! measurements is published.
//!
//! ```rust
//! use std::sync::Arc;
//! use stationwatch_weather::{
//!     CurrentConditionsDisplay, ForecastDisplay, MemorySink, StationConfig, WeatherStation,
//! };
//!
//! let config = StationConfig::default();
//! let weather = config.build_weather_data();
//! let sink = Arc::new(MemorySink::new());
//!
//! let _current = CurrentConditionsDisplay::attached(&weather, sink.clone());
//! let _forecast = ForecastDisplay::attached(&weather, sink.clone());
//!
//! weather.set_measurements(80.0, 65.0, 30.4)?;
//!
//! assert_eq!(
//!     sink.last_from("current_conditions").as_deref(),
//!     Some("Current conditions: 80.0F degrees and 65.0% humidity"),
//! );
//! assert_eq!(sink.last_from("forecast").as_deref(), Some("Forecast: improving"));
//! # Ok::<(), stationwatch_core::SubjectError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod displays;
pub mod measurements;
pub mod sink;
pub mod trend;

// Public API
pub use config::{ConfigError, ForecastConfig, StationConfig, DEFAULT_INITIAL_PRESSURE};
pub use displays::{
    CurrentConditionsDisplay, DisplayElement, ForecastDisplay, HeatIndexDisplay, PressureHistory,
    StatisticsDisplay, WeatherDisplay,
};
pub use measurements::{Measurements, WeatherData, WeatherStation};
pub use sink::{LogSink, MemorySink, RenderSink, RenderedLine};
pub use trend::Trend;
