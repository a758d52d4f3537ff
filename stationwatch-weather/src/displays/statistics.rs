//! Temperature Statistics Display
//!
//! Keeps running aggregates, not a log of readings:
//!
//! ```text
//! count  sum      min    max
//!   u32  f64      f32    f32      ← constant size no matter how long it runs
//! ```
//!
//! The sum is kept in `f64` so long-running stations do not lose the
//! fractional part of each reading to `f32` rounding.

use std::sync::{Arc, Mutex};

use stationwatch_core::{Observer, ObserverResult};

use super::{attach_new, lock_state, Attachment, DisplayElement, WeatherDisplay};
use crate::measurements::{WeatherData, WeatherStation};
use crate::sink::RenderSink;

/// Running min/max/mean over every temperature seen
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunningStats {
    count: u32,
    sum: f64,
    min: f32,
    max: f32,
}

impl RunningStats {
    /// Fold in one reading
    pub fn record(&mut self, value: f32) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.sum += f64::from(value);
        self.count = self.count.saturating_add(1);
    }

    /// Number of readings folded in
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Mean of all readings
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }

    /// Lowest reading
    pub fn min(&self) -> Option<f32> {
        (self.count > 0).then_some(self.min)
    }

    /// Highest reading
    pub fn max(&self) -> Option<f32> {
        (self.count > 0).then_some(self.max)
    }
}

/// Shows average, maximum and minimum temperature
pub struct StatisticsDisplay {
    attachment: Attachment,
    sink: Arc<dyn RenderSink>,
    stats: Mutex<RunningStats>,
}

impl StatisticsDisplay {
    /// Name used for sink output and failure reports
    pub const NAME: &'static str = "statistics";

    /// Build; not yet attached
    pub fn new(subject: &Arc<WeatherData>, sink: Arc<dyn RenderSink>) -> Self {
        Self {
            attachment: Attachment::new(subject),
            sink,
            stats: Mutex::new(RunningStats::default()),
        }
    }

    /// Build and register in one step
    pub fn attached(subject: &Arc<WeatherData>, sink: Arc<dyn RenderSink>) -> Arc<Self> {
        attach_new(subject, Self::new(subject, sink))
    }

    /// Aggregates so far
    pub fn stats(&self) -> ObserverResult<RunningStats> {
        Ok(*lock_state(&self.stats, "temperature statistics")?)
    }
}

impl DisplayElement for StatisticsDisplay {
    fn render(&self) -> ObserverResult<String> {
        let stats = self.stats()?;
        let line = match (stats.mean(), stats.max(), stats.min()) {
            (Some(mean), Some(max), Some(min)) => {
                format!("Avg/Max/Min temperature = {mean:.1}/{max:.1}/{min:.1}")
            }
            _ => "Avg/Max/Min temperature = n/a".to_owned(),
        };
        Ok(line)
    }
}

impl Observer for StatisticsDisplay {
    fn update(&self) -> ObserverResult<()> {
        let temperature = self.attachment.subject()?.temperature();
        lock_state(&self.stats, "temperature statistics")?.record(temperature);

        let line = self.render()?;
        self.sink.emit(Self::NAME, &line);
        Ok(())
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

impl WeatherDisplay for StatisticsDisplay {
    fn attachment(&self) -> &Attachment {
        &self.attachment
    }
}
