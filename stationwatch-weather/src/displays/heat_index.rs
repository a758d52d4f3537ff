//! Heat index ("feels like") from temperature and relative humidity.

use std::sync::{Arc, Mutex};

use stationwatch_core::{Observer, ObserverResult};

use super::{attach_new, lock_state, Attachment, DisplayElement, WeatherDisplay};
use crate::measurements::WeatherData;
use crate::sink::RenderSink;

/// Heat index in °F for a temperature in °F and relative humidity in percent
///
/// Sixteen-term polynomial regression, evaluated in `f64`. Meaningful for
/// warm, humid air; below roughly 80°F it drifts away from the air
/// temperature without physical meaning.
pub fn heat_index(temperature: f32, humidity: f32) -> f64 {
    let t = f64::from(temperature);
    let rh = f64::from(humidity);

    16.923 + (0.185212 * t) + (5.37941 * rh) - (0.100254 * t * rh)
        + (0.00941695 * (t * t))
        + (0.00728898 * (rh * rh))
        + (0.000345372 * (t * t * rh))
        - (0.000814971 * (t * rh * rh))
        + (0.0000102102 * (t * t * rh * rh))
        - (0.000038646 * (t * t * t))
        + (0.0000291583 * (rh * rh * rh))
        + (0.00000142721 * (t * t * t * rh))
        + (0.000000197483 * (t * rh * rh * rh))
        - (0.0000000218429 * (t * t * t * rh * rh))
        + (0.000000000843296 * (t * t * rh * rh * rh))
        - (0.0000000000481975 * (t * t * t * rh * rh * rh))
}

/// Shows the heat index for the latest reading
pub struct HeatIndexDisplay {
    attachment: Attachment,
    sink: Arc<dyn RenderSink>,
    index: Mutex<Option<f64>>,
}

impl HeatIndexDisplay {
    /// Name used for sink output and failure reports
    pub const NAME: &'static str = "heat_index";

    /// Build; not yet attached
    pub fn new(subject: &Arc<WeatherData>, sink: Arc<dyn RenderSink>) -> Self {
        Self {
            attachment: Attachment::new(subject),
            sink,
            index: Mutex::new(None),
        }
    }

    /// Build and register in one step
    pub fn attached(subject: &Arc<WeatherData>, sink: Arc<dyn RenderSink>) -> Arc<Self> {
        attach_new(subject, Self::new(subject, sink))
    }

    /// Heat index of the latest reading, if any
    pub fn index(&self) -> ObserverResult<Option<f64>> {
        Ok(*lock_state(&self.index, "heat index")?)
    }
}

impl DisplayElement for HeatIndexDisplay {
    fn render(&self) -> ObserverResult<String> {
        let line = match self.index()? {
            Some(index) => format!("Heat index is {index:.5}"),
            None => "Heat index is n/a".to_owned(),
        };
        Ok(line)
    }
}

impl Observer for HeatIndexDisplay {
    fn update(&self) -> ObserverResult<()> {
        let measurements = self.attachment.subject()?.get_state();
        let index = heat_index(measurements.temperature, measurements.humidity);
        *lock_state(&self.index, "heat index")? = Some(index);

        let line = self.render()?;
        self.sink.emit(Self::NAME, &line);
        Ok(())
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

impl WeatherDisplay for HeatIndexDisplay {
    fn attachment(&self) -> &Attachment {
        &self.attachment
    }
}
