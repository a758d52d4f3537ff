//! Subject/observer notification core for StationWatch
//!
//! Holds a piece of live state and pushes "something changed" to an open set
//! of observers every time that state is replaced. Observers pull what they
//! need; the subject never knows what they consume.
//!
//! Guarantees:
//! - One `set_state` call produces exactly one notification pass
//! - A pass calls each registered observer once, in registration order
//! - Observers always read the state that triggered the pass
//! - Concurrent mutations are serialized, never interleaved
//!
//! ```rust
//! use std::sync::{Arc, Mutex, Weak};
//! use stationwatch_core::{Observer, ObserverError, ObserverResult, Subject};
//!
//! struct LastSeen {
//!     subject: Weak<Subject<f32>>,
//!     value: Mutex<Option<f32>>,
//! }
//!
//! impl Observer for LastSeen {
//!     fn update(&self) -> ObserverResult<()> {
//!         let subject = self.subject.upgrade().ok_or(ObserverError::SubjectGone)?;
//!         *self.value.lock().unwrap() = Some(subject.get_state());
//!         Ok(())
//!     }
//! }
//!
//! let subject = Arc::new(Subject::new(29.92_f32));
//! let seen = Arc::new(LastSeen { subject: Arc::downgrade(&subject), value: Mutex::new(None) });
//! subject.register(&seen);
//!
//! let report = subject.set_state(30.10)?;
//! assert_eq!(report.delivered, 1);
//! assert_eq!(*seen.value.lock().unwrap(), Some(30.10));
//! # Ok::<(), stationwatch_core::SubjectError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod errors;
pub mod observer;
pub mod policy;
pub mod state;
pub mod subject;

// Public API
pub use errors::{ObserverError, ObserverResult, SubjectError, SubjectResult};
pub use observer::{Observer, ObserverId};
pub use policy::{NotifyFailure, NotifyPolicy, NotifyReport};
pub use state::Validatable;
pub use subject::Subject;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
