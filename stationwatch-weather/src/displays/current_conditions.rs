//! Current conditions: the latest temperature and humidity, as read.

use std::sync::{Arc, Mutex};

use stationwatch_core::{Observer, ObserverResult};

use super::{attach_new, lock_state, Attachment, DisplayElement, WeatherDisplay};
use crate::measurements::WeatherData;
use crate::sink::RenderSink;

/// Shows the most recent temperature and humidity
pub struct CurrentConditionsDisplay {
    attachment: Attachment,
    sink: Arc<dyn RenderSink>,
    latest: Mutex<Option<(f32, f32)>>,
}

impl CurrentConditionsDisplay {
    /// Name used for sink output and failure reports
    pub const NAME: &'static str = "current_conditions";

    /// Build; not yet attached
    pub fn new(subject: &Arc<WeatherData>, sink: Arc<dyn RenderSink>) -> Self {
        Self {
            attachment: Attachment::new(subject),
            sink,
            latest: Mutex::new(None),
        }
    }

    /// Build and register in one step
    pub fn attached(subject: &Arc<WeatherData>, sink: Arc<dyn RenderSink>) -> Arc<Self> {
        attach_new(subject, Self::new(subject, sink))
    }
}

impl DisplayElement for CurrentConditionsDisplay {
    fn render(&self) -> ObserverResult<String> {
        let line = match *lock_state(&self.latest, "current conditions")? {
            Some((temperature, humidity)) => {
                format!("Current conditions: {temperature:.1}F degrees and {humidity:.1}% humidity")
            }
            None => "Current conditions: no readings yet".to_owned(),
        };
        Ok(line)
    }
}

impl Observer for CurrentConditionsDisplay {
    fn update(&self) -> ObserverResult<()> {
        let measurements = self.attachment.subject()?.get_state();
        let reading = (measurements.temperature, measurements.humidity);
        *lock_state(&self.latest, "current conditions")? = Some(reading);

        let line = self.render()?;
        self.sink.emit(Self::NAME, &line);
        Ok(())
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

impl WeatherDisplay for CurrentConditionsDisplay {
    fn attachment(&self) -> &Attachment {
        &self.attachment
    }
}
