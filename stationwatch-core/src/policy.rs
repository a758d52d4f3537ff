//! Notification policy and pass reports
//!
//! What happens when one observer's update handler fails is a deliberate
//! choice, configured per subject:
//!
//! | Policy     | Failing observer                        | Rest of the pass |
//! |------------|-----------------------------------------|------------------|
//! | `Isolate`  | logged, recorded in the report          | still notified   |
//! | `FailFast` | returned as `SubjectError::ObserverFailed` | not notified  |
//!
//! In both cases the state mutation that triggered the pass stays applied.

use serde::{Deserialize, Serialize};

use crate::errors::ObserverError;
use crate::observer::ObserverId;

/// How a notification pass reacts to a failing observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyPolicy {
    /// Log and record the failure, keep notifying the remaining observers
    #[default]
    Isolate,
    /// Abort the remaining pass on the first failure
    FailFast,
}

/// One observer failure captured under [`NotifyPolicy::Isolate`]
#[derive(Debug, Clone, PartialEq)]
pub struct NotifyFailure {
    /// Registration id of the observer
    pub id: ObserverId,
    /// Name the observer reported
    pub name: String,
    /// What went wrong
    pub error: ObserverError,
}

/// Outcome of a single notification pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotifyReport {
    /// Observers whose update handler returned `Ok`
    pub delivered: usize,
    /// Snapshot entries not called: detached mid-pass, or already dropped
    pub skipped: usize,
    /// Observers whose update handler returned an error
    pub failures: Vec<NotifyFailure>,
}

impl NotifyReport {
    /// True when every called observer succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of update handlers that were actually invoked
    pub fn attempted(&self) -> usize {
        self.delivered + self.failures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolate_is_default() {
        assert_eq!(NotifyPolicy::default(), NotifyPolicy::Isolate);
    }

    #[test]
    fn policy_from_config_text() {
        let policy: NotifyPolicy = serde_json::from_str("\"fail_fast\"").unwrap();
        assert_eq!(policy, NotifyPolicy::FailFast);

        let policy: NotifyPolicy = serde_json::from_str("\"isolate\"").unwrap();
        assert_eq!(policy, NotifyPolicy::Isolate);
    }

    #[test]
    fn report_counts() {
        let mut report = NotifyReport {
            delivered: 2,
            ..NotifyReport::default()
        };
        assert!(report.is_clean());

        report.failures.push(NotifyFailure {
            id: ObserverId::from_raw(0),
            name: "broken".to_owned(),
            error: ObserverError::Other("boom".to_owned()),
        });
        assert!(!report.is_clean());
        assert_eq!(report.attempted(), 3);
    }
}
