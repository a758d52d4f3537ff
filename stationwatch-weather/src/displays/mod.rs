//! Weather Displays
//!
//! ## Overview
//!
//! Each display is an [`Observer`] of the weather subject. On every
//! notification it pulls the readings it cares about, updates whatever it
//! derives from them, renders one line and hands it to its [`RenderSink`].
//!
//! ```text
//! set_measurements ─► WeatherData ─► CurrentConditions ─► "Current conditions: ..."
//!                                 ─► Statistics        ─► "Avg/Max/Min temperature = ..."
//!                                 ─► Forecast          ─► "Forecast: improving"
//!                                 ─► HeatIndex         ─► "Heat index is ..."
//! ```
//!
//! ## Attaching
//!
//! Construction and attachment are separate steps. Building a display has no
//! side effect on the subject; [`WeatherDisplay::attach`] registers it.
//! Every display also has an `attached` constructor doing both at once.
//!
//! ```rust
//! use std::sync::Arc;
//! use stationwatch_weather::{
//!     ForecastDisplay, MemorySink, WeatherData, WeatherDisplay, WeatherStation,
//! };
//!
//! let weather = Arc::new(WeatherData::default());
//! let sink = Arc::new(MemorySink::new());
//!
//! let forecast = Arc::new(ForecastDisplay::new(&weather, sink.clone()));
//! forecast.attach()?;
//!
//! weather.set_measurements(80.0, 65.0, 30.4)?;
//! assert_eq!(sink.last_from("forecast").as_deref(), Some("Forecast: improving"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Displays hold only a `Weak` reference to the subject. If the subject is
//! gone, `update` fails with [`ObserverError::SubjectGone`] and `attach`
//! reports the same error.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use stationwatch_core::{Observer, ObserverError, ObserverId, ObserverResult};

use crate::measurements::WeatherData;

mod current_conditions;
mod forecast;
mod heat_index;
mod statistics;

pub use current_conditions::CurrentConditionsDisplay;
pub use forecast::{ForecastDisplay, PressureHistory};
pub use heat_index::{heat_index, HeatIndexDisplay};
pub use statistics::{RunningStats, StatisticsDisplay};

/// Something that can describe what it currently shows
pub trait DisplayElement {
    /// Render the display's current content as one line
    fn render(&self) -> ObserverResult<String>;
}

/// A display's link to the weather subject
#[derive(Debug)]
pub struct Attachment {
    subject: Weak<WeatherData>,
    id: Mutex<Option<ObserverId>>,
}

impl Attachment {
    /// Link to a live subject
    pub fn new(subject: &Arc<WeatherData>) -> Self {
        Self::unchecked(Arc::downgrade(subject))
    }

    /// Link to a subject that may already be gone; fails if it is
    pub fn from_weak(subject: Weak<WeatherData>) -> ObserverResult<Self> {
        if subject.strong_count() == 0 {
            return Err(ObserverError::SubjectGone);
        }
        Ok(Self::unchecked(subject))
    }

    fn unchecked(subject: Weak<WeatherData>) -> Self {
        Self {
            subject,
            id: Mutex::new(None),
        }
    }

    /// The subject, if it still exists
    pub fn subject(&self) -> ObserverResult<Arc<WeatherData>> {
        self.subject.upgrade().ok_or(ObserverError::SubjectGone)
    }

    /// Registration id, while attached
    pub fn id(&self) -> Option<ObserverId> {
        *self.lock_id()
    }

    fn register<O>(&self, subject: &WeatherData, observer: &Arc<O>) -> ObserverId
    where
        O: Observer + 'static,
    {
        let id = subject.register(observer);
        *self.lock_id() = Some(id);
        id
    }

    fn detach(&self) -> bool {
        let Some(id) = self.lock_id().take() else {
            return false;
        };
        match self.subject.upgrade() {
            Some(subject) => subject.unregister_id(id),
            None => false,
        }
    }

    fn lock_id(&self) -> MutexGuard<'_, Option<ObserverId>> {
        self.id.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Attach/detach plumbing shared by every weather display
pub trait WeatherDisplay: Observer + DisplayElement + Sized + 'static {
    /// The display's link to its subject
    fn attachment(&self) -> &Attachment;

    /// Register with the subject; idempotent
    fn attach(self: &Arc<Self>) -> ObserverResult<ObserverId> {
        let subject = self.attachment().subject()?;
        Ok(self.attachment().register(&subject, self))
    }

    /// Unregister from the subject; safe to call from inside `update`
    fn detach(&self) -> bool {
        self.attachment().detach()
    }

    /// Registration id, while attached
    fn observer_id(&self) -> Option<ObserverId> {
        self.attachment().id()
    }

    /// Whether the display is currently registered
    fn is_attached(&self) -> bool {
        match (self.observer_id(), self.attachment().subject()) {
            (Some(id), Ok(subject)) => subject.is_registered(id),
            _ => false,
        }
    }
}

/// Wrap a freshly built display in an `Arc` and register it
pub(crate) fn attach_new<D: WeatherDisplay>(subject: &Arc<WeatherData>, display: D) -> Arc<D> {
    let display = Arc::new(display);
    display.attachment().register(subject, &display);
    display
}

/// Lock a display's derived state, reporting poisoning as an observer error
pub(crate) fn lock_state<'a, T>(
    state: &'a Mutex<T>,
    what: &'static str,
) -> ObserverResult<MutexGuard<'a, T>> {
    state.lock().map_err(|_| ObserverError::Poisoned(what))
}
