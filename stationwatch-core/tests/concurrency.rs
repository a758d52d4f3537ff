//! Concurrency and reentrancy tests
//!
//! Mutations from several threads must be totally ordered: every observer
//! sees one delivery per `set_state`, and never a torn snapshot.

mod common;

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::thread;

use common::{Journal, Recorder};
use stationwatch_core::{
    Observer, ObserverError, ObserverResult, Subject, SubjectError, Validatable,
};

/// Two fields that must always move together
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pair {
    left: u64,
    right: u64,
}

impl Validatable for Pair {
    fn is_valid(&self) -> bool {
        self.left == self.right
    }

    fn rejection_reason(&self) -> &'static str {
        "pair halves disagree"
    }
}

#[test]
fn concurrent_mutations_are_serialized() {
    const WRITERS: u64 = 4;
    const WRITES_PER_THREAD: u64 = 250;

    let subject = Arc::new(Subject::new(Pair { left: 0, right: 0 }));
    let journal = Journal::new();
    let a = Recorder::new("a", &subject, &journal);
    let b = Recorder::new("b", &subject, &journal);
    subject.register(&a);
    subject.register(&b);

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let subject = Arc::clone(&subject);
            thread::spawn(move || {
                for i in 0..WRITES_PER_THREAD {
                    let value = writer * 10_000 + i;
                    subject.set_state(Pair { left: value, right: value }).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let entries = journal.entries();
    let total = (WRITERS * WRITES_PER_THREAD) as usize;
    assert_eq!(journal.count_for("a"), total);
    assert_eq!(journal.count_for("b"), total);

    // Passes never interleave: deliveries come in a/b pairs reading the same state
    for pair in entries.chunks(2) {
        assert_eq!(pair[0].observer, "a");
        assert_eq!(pair[1].observer, "b");
        assert_eq!(pair[0].state, pair[1].state);
        assert_eq!(pair[0].state.left, pair[0].state.right);
    }
}

#[test]
fn registration_from_other_threads_during_passes() {
    let subject = Arc::new(Subject::new(0_u32));
    let journal = Journal::new();
    let steady = Recorder::new("steady", &subject, &journal);
    subject.register(&steady);

    let churn = {
        let subject = Arc::clone(&subject);
        let journal = Arc::clone(&journal);
        thread::spawn(move || {
            for _ in 0..200 {
                let transient = Recorder::new("transient", &subject, &journal);
                subject.register(&transient);
                subject.unregister(&transient);
            }
        })
    };

    for value in 1..=200 {
        subject.set_state(value).unwrap();
    }
    churn.join().unwrap();

    assert_eq!(journal.count_for("steady"), 200);
    assert_eq!(subject.observer_count(), 1);
}

/// Tries to mutate the subject from inside its own update handler
struct Meddler {
    subject: Weak<Subject<u32>>,
    outcome: Mutex<Option<SubjectError>>,
}

impl Observer for Meddler {
    fn update(&self) -> ObserverResult<()> {
        let subject = self.subject.upgrade().ok_or(ObserverError::SubjectGone)?;
        let attempt = subject.set_state(subject.get_state() + 1);
        *self.outcome.lock().unwrap() = attempt.err();
        Ok(())
    }
}

#[test]
fn reentrant_mutation_is_rejected() {
    let subject = Arc::new(Subject::new(0_u32));
    let meddler = Arc::new(Meddler {
        subject: Arc::downgrade(&subject),
        outcome: Mutex::new(None),
    });
    subject.register(&meddler);

    subject.set_state(5).unwrap();

    assert_eq!(*meddler.outcome.lock().unwrap(), Some(SubjectError::ReentrantPass));
    assert_eq!(subject.get_state(), 5);

    // The marker is cleared once the pass ends
    subject.set_state(6).unwrap();
    assert_eq!(subject.get_state(), 6);
}

/// Panics on its first update, behaves afterwards
struct Panicky {
    armed: AtomicBool,
    updates: Mutex<u32>,
}

impl Observer for Panicky {
    fn update(&self) -> ObserverResult<()> {
        if self.armed.swap(false, Ordering::SeqCst) {
            panic!("sensor driver crashed");
        }
        *self.updates.lock().unwrap() += 1;
        Ok(())
    }
}

#[test]
fn subject_survives_panicking_observer() {
    let subject = Arc::new(Subject::new(0_u32));
    let journal = Journal::new();
    let panicky = Arc::new(Panicky {
        armed: AtomicBool::new(true),
        updates: Mutex::new(0),
    });
    let after = Recorder::new("after", &subject, &journal);
    subject.register(&panicky);
    subject.register(&after);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| subject.set_state(1)));
    assert!(outcome.is_err());
    assert_eq!(subject.get_state(), 1);
    assert!(journal.entries().is_empty());

    // Pass lock was poisoned by the unwind; the next pass recovers and the
    // reentrancy marker no longer points at this thread
    let report = subject.set_state(2).unwrap();

    assert_eq!(report.delivered, 2);
    assert_eq!(*panicky.updates.lock().unwrap(), 1);
    assert_eq!(journal.names(), vec!["after"]);
    assert_eq!(journal.entries()[0].state, 2);
    assert_eq!(subject.observer_count(), 2);

    subject.notify_all().unwrap();
    assert_eq!(journal.count_for("after"), 2);
}

#[test]
fn torn_state_is_rejected() {
    let subject = Subject::new(Pair { left: 1, right: 1 });

    let err = subject.set_state(Pair { left: 2, right: 3 }).unwrap_err();

    assert_eq!(err, SubjectError::InvalidState("pair halves disagree"));
    assert_eq!(subject.get_state(), Pair { left: 1, right: 1 });
}
