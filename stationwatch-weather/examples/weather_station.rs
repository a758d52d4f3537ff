//! Weather station demo
//!
//! Wires all four displays to one subject, publishes three sets of readings,
//! takes the forecast display off the air and publishes a fourth.
//!
//! ```bash
//! RUST_LOG=info cargo run -p stationwatch-weather --example weather_station
//! ```

use std::sync::Arc;

use stationwatch_weather::{
    CurrentConditionsDisplay, ForecastDisplay, HeatIndexDisplay, LogSink, RenderSink, StationConfig,
    StatisticsDisplay, WeatherDisplay, WeatherStation,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => StationConfig::from_path(path)?,
        None => StationConfig::default(),
    };

    let weather = config.build_weather_data();
    let sink: Arc<dyn RenderSink> = Arc::new(LogSink::default());

    let _current = CurrentConditionsDisplay::attached(&weather, sink.clone());
    let _statistics = StatisticsDisplay::attached(&weather, sink.clone());
    let forecast = ForecastDisplay::with_config(&weather, sink.clone(), &config.forecast)?;
    let forecast = Arc::new(forecast);
    forecast.attach()?;
    let _heat_index = HeatIndexDisplay::attached(&weather, sink);

    weather.set_measurements(80.0, 65.0, 30.4)?;
    weather.set_measurements(82.0, 70.0, 29.2)?;
    weather.set_measurements(78.0, 90.0, 29.2)?;

    forecast.detach();
    let report = weather.set_measurements(62.0, 90.0, 28.1)?;
    log::info!("Last pass reached {} displays", report.delivered);

    Ok(())
}
