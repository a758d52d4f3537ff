//! Error Types for the Notification Protocol
//!
//! ## Error Categories
//!
//! Failures in a subject/observer graph are structural, never transient, so
//! nothing here is retried.
//!
//! ### Observer-side
//! - `SubjectGone`: the subject an observer was attached to has been dropped
//! - `Poisoned`: an observer's own state lock was poisoned by a panic
//! - `Render` / `Other`: the observer could not produce its output
//!
//! ### Subject-side
//! - `InvalidState`: a mutation was rejected before it was applied
//! - `ReentrantPass`: `set_state` or `notify_all` called from inside a
//!   notification pass on the same thread
//! - `ObserverFailed`: surfaced only under [`NotifyPolicy::FailFast`]
//!
//! ## Handling Strategy
//!
//! ```rust
//! use stationwatch_core::{Subject, SubjectError};
//!
//! let subject = Subject::new(29.92_f32);
//! match subject.set_state(f32::NAN) {
//!     Ok(report) => assert!(report.is_clean()),
//!     Err(SubjectError::InvalidState(reason)) => {
//!         // Upstream sent a broken snapshot; the old state is untouched
//!         assert!(!reason.is_empty());
//!     }
//!     Err(other) => panic!("unexpected: {other}"),
//! }
//! assert_eq!(subject.get_state(), 29.92);
//! ```
//!
//! [`NotifyPolicy::FailFast`]: crate::NotifyPolicy::FailFast

use thiserror::Error;

use crate::observer::ObserverId;

/// Result type for observer update handlers
pub type ObserverResult<T> = Result<T, ObserverError>;

/// Result type for subject operations
pub type SubjectResult<T> = Result<T, SubjectError>;

/// Errors raised by an observer while handling a notification
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObserverError {
    /// The subject this observer pulls from no longer exists
    #[error("Subject is no longer alive")]
    SubjectGone,

    /// The observer's internal state lock was poisoned
    #[error("Observer lock poisoned: {0}")]
    Poisoned(&'static str),

    /// Derived output could not be produced
    #[error("Render failed: {0}")]
    Render(String),

    /// Any other observer-specific failure
    #[error("Observer failed: {0}")]
    Other(String),
}

/// Errors raised by a subject while mutating state or notifying
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubjectError {
    /// The new state failed validation; nothing was mutated or notified
    #[error("Invalid state rejected: {0}")]
    InvalidState(&'static str),

    /// A pass was started (by `set_state` or `notify_all`) from inside a
    /// notification pass on the same thread
    #[error("Notification pass started from inside another pass")]
    ReentrantPass,

    /// An observer failed and the subject runs with the fail-fast policy
    #[error("Observer {id} ({name}) failed: {source}")]
    ObserverFailed {
        /// Registration id of the failing observer
        id: ObserverId,
        /// Name reported by the failing observer
        name: String,
        /// The observer's error
        source: ObserverError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observer_failed_chains_source() {
        use std::error::Error as _;

        let err = SubjectError::ObserverFailed {
            id: ObserverId::from_raw(3),
            name: "forecast".to_owned(),
            source: ObserverError::SubjectGone,
        };

        assert_eq!(err.to_string(), "Observer #3 (forecast) failed: Subject is no longer alive");
        assert!(err.source().is_some());
    }
}
