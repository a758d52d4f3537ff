//! Observer capability
//!
//! An observer is anything that can be told "the subject changed". The
//! notification carries no payload: each observer pulls whatever it needs
//! from the subject it was attached with, so the subject never has to know
//! what its consumers read.
//!
//! ```rust
//! use std::sync::{Arc, Mutex, Weak};
//! use stationwatch_core::{Observer, ObserverError, ObserverResult, Subject};
//!
//! struct Echo {
//!     subject: Weak<Subject<u32>>,
//!     seen: Mutex<Vec<u32>>,
//! }
//!
//! impl Observer for Echo {
//!     fn update(&self) -> ObserverResult<()> {
//!         let subject = self.subject.upgrade().ok_or(ObserverError::SubjectGone)?;
//!         self.seen.lock().unwrap().push(subject.get_state());
//!         Ok(())
//!     }
//! }
//!
//! let subject = Arc::new(Subject::new(0_u32));
//! let echo = Arc::new(Echo { subject: Arc::downgrade(&subject), seen: Mutex::new(Vec::new()) });
//! subject.register(&echo);
//!
//! subject.set_state(7).unwrap();
//! assert_eq!(*echo.seen.lock().unwrap(), vec![7]);
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ObserverResult;

/// A registered consumer of subject state changes
///
/// Implementations are shared across threads through `Arc`, so any state they
/// keep between notifications lives behind interior mutability.
pub trait Observer: Send + Sync {
    /// Handle one notification
    ///
    /// Called synchronously from the subject's notification pass. The
    /// subject's state, observer list and registration calls are all usable
    /// from here; mutating the subject is not.
    fn update(&self) -> ObserverResult<()>;

    /// Name used in log lines and failure reports
    fn name(&self) -> &str {
        "observer"
    }
}

/// Handle returned by registration, stable for the lifetime of the entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObserverId(u64);

impl ObserverId {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
