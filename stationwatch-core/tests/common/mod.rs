//! Shared observers for integration tests
//!
//! Every observer here writes into a [`Journal`] so tests can assert on the
//! exact sequence of deliveries across a pass.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, OnceLock, Weak};

use stationwatch_core::{Observer, ObserverError, ObserverId, ObserverResult, Subject};

/// One delivery: which observer ran and what state it read
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery<S> {
    pub observer: String,
    pub state: S,
}

/// Ordered record of deliveries shared by a group of observers
pub struct Journal<S> {
    entries: Mutex<Vec<Delivery<S>>>,
}

impl<S: Clone> Journal<S> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entries: Mutex::new(Vec::new()),
        })
    }

    pub fn record(&self, observer: &str, state: S) {
        self.entries.lock().unwrap().push(Delivery {
            observer: observer.to_owned(),
            state,
        });
    }

    pub fn entries(&self) -> Vec<Delivery<S>> {
        self.entries.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries().into_iter().map(|d| d.observer).collect()
    }

    pub fn count_for(&self, observer: &str) -> usize {
        self.entries().iter().filter(|d| d.observer == observer).count()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

/// Pulls the state on every update and journals it
pub struct Recorder<S> {
    name: String,
    subject: Weak<Subject<S>>,
    journal: Arc<Journal<S>>,
}

impl<S: Clone + Send + Sync + 'static> Recorder<S> {
    pub fn new(name: &str, subject: &Arc<Subject<S>>, journal: &Arc<Journal<S>>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            subject: Arc::downgrade(subject),
            journal: Arc::clone(journal),
        })
    }
}

impl<S: Clone + Send + Sync> Observer for Recorder<S> {
    fn update(&self) -> ObserverResult<()> {
        let subject = self.subject.upgrade().ok_or(ObserverError::SubjectGone)?;
        self.journal.record(&self.name, subject.get_state());
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Journals, then unregisters itself from inside its own update
pub struct SelfDetacher<S> {
    name: String,
    subject: Weak<Subject<S>>,
    journal: Arc<Journal<S>>,
    id: OnceLock<ObserverId>,
}

impl<S: Clone + Send + Sync + 'static> SelfDetacher<S> {
    pub fn attach(name: &str, subject: &Arc<Subject<S>>, journal: &Arc<Journal<S>>) -> Arc<Self> {
        let observer = Arc::new(Self {
            name: name.to_owned(),
            subject: Arc::downgrade(subject),
            journal: Arc::clone(journal),
            id: OnceLock::new(),
        });
        let id = subject.register(&observer);
        observer.id.set(id).unwrap();
        observer
    }
}

impl<S: Clone + Send + Sync> Observer for SelfDetacher<S> {
    fn update(&self) -> ObserverResult<()> {
        let subject = self.subject.upgrade().ok_or(ObserverError::SubjectGone)?;
        self.journal.record(&self.name, subject.get_state());
        if let Some(id) = self.id.get() {
            subject.unregister_id(*id);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Unregisters another observer when it runs
pub struct Evictor<S> {
    subject: Weak<Subject<S>>,
    victim: OnceLock<ObserverId>,
}

impl<S: Send + Sync + 'static> Evictor<S> {
    pub fn new(subject: &Arc<Subject<S>>) -> Arc<Self> {
        Arc::new(Self {
            subject: Arc::downgrade(subject),
            victim: OnceLock::new(),
        })
    }

    pub fn target(&self, victim: ObserverId) {
        self.victim.set(victim).unwrap();
    }
}

impl<S: Send + Sync> Observer for Evictor<S> {
    fn update(&self) -> ObserverResult<()> {
        let subject = self.subject.upgrade().ok_or(ObserverError::SubjectGone)?;
        if let Some(victim) = self.victim.get() {
            subject.unregister_id(*victim);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "evictor"
    }
}

/// Registers a late observer when it runs
pub struct Recruiter<S> {
    subject: Weak<Subject<S>>,
    recruit: Arc<Recorder<S>>,
}

impl<S: Clone + Send + Sync + 'static> Recruiter<S> {
    pub fn new(subject: &Arc<Subject<S>>, recruit: &Arc<Recorder<S>>) -> Arc<Self> {
        Arc::new(Self {
            subject: Arc::downgrade(subject),
            recruit: Arc::clone(recruit),
        })
    }
}

impl<S: Clone + Send + Sync + 'static> Observer for Recruiter<S> {
    fn update(&self) -> ObserverResult<()> {
        let subject = self.subject.upgrade().ok_or(ObserverError::SubjectGone)?;
        subject.register(&self.recruit);
        Ok(())
    }

    fn name(&self) -> &str {
        "recruiter"
    }
}

/// Always fails
pub struct Faulty;

impl Observer for Faulty {
    fn update(&self) -> ObserverResult<()> {
        Err(ObserverError::Render("display unplugged".to_owned()))
    }

    fn name(&self) -> &str {
        "faulty"
    }
}
