//! Subject: Observable State with Ordered, Exactly-Once Notification
//!
//! ## Overview
//!
//! A [`Subject`] owns one piece of state and a list of observers. Every call
//! to [`Subject::set_state`] replaces the state and then runs one
//! *notification pass*: each registered observer's `update()` is invoked
//! once, in registration order, on the caller's thread, before `set_state`
//! returns.
//!
//! ```text
//! upstream ──set_state(s)──► Subject ──update()──► observer A ──get_state()──┐
//!                              │      ──update()──► observer B ──get_state()──┤
//!                              │                                              │
//!                              └─────────────────── state = s ◄───────────────┘
//! ```
//!
//! ## Ownership
//!
//! The subject never owns its observers. Entries are `Weak<dyn Observer>`:
//! an observer dropped by its owner is skipped on the next pass and pruned
//! from the list. Observers likewise hold a `Weak` back to the subject, so
//! either side can go first.
//!
//! ## Concurrency
//!
//! The subject is `Send + Sync` and meant to be shared as `Arc<Subject<S>>`.
//! Three locks, each with a narrow job:
//!
//! - `pass`: serializes mutate-then-notify. Concurrent `set_state` calls are
//!   totally ordered and never interleave within a pass.
//! - `state`: guards the value only for the duration of a read or a write.
//! - `observers`: guards the list only while it is edited or snapshotted.
//!
//! No lock except `pass` is held while observer code runs, which is what lets
//! observers call `get_state`, `register` and `unregister` from `update()`.
//!
//! ## Snapshot Policy
//!
//! The observer list is copied at the start of each pass.
//!
//! - Registered mid-pass: not notified until the next pass.
//! - Unregistered mid-pass (including self-detach): not called for the rest
//!   of the pass. Each entry's registration is re-checked right before its
//!   `update()` runs.
//! - `set_state` or `notify_all` from inside `update()` on the same thread:
//!   rejected with [`SubjectError::ReentrantPass`].
//!
//! Lock poisoning is recovered from rather than surfaced: observer code never
//! runs while `state` or `observers` is held, so neither can be left half
//! written by a panicking observer.

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak,
};
use std::thread::{self, ThreadId};

use crate::errors::{SubjectError, SubjectResult};
use crate::observer::{Observer, ObserverId};
use crate::policy::{NotifyFailure, NotifyPolicy, NotifyReport};
use crate::state::Validatable;

/// One entry in the observer list
struct Registration {
    id: ObserverId,
    observer: Weak<dyn Observer>,
}

impl Registration {
    /// Identity is the address of the observer allocation.
    /// The live `Weak` pins that allocation, so an address cannot be reused
    /// by a different observer while the entry exists.
    fn points_to(&self, address: *const ()) -> bool {
        self.observer.as_ptr().cast::<()>() == address
    }

    fn is_alive(&self) -> bool {
        self.observer.strong_count() > 0
    }
}

/// Observable state with an ordered set of non-owning observers
pub struct Subject<S> {
    state: RwLock<S>,
    observers: Mutex<Vec<Registration>>,
    pass: Mutex<()>,
    notifying: Mutex<Option<ThreadId>>,
    next_id: AtomicU64,
    policy: NotifyPolicy,
}

impl<S> Subject<S> {
    /// Create a subject with the default [`NotifyPolicy::Isolate`] policy
    pub fn new(initial: S) -> Self {
        Self::with_policy(initial, NotifyPolicy::default())
    }

    /// Create a subject with an explicit failure policy
    pub fn with_policy(initial: S, policy: NotifyPolicy) -> Self {
        Self {
            state: RwLock::new(initial),
            observers: Mutex::new(Vec::new()),
            pass: Mutex::new(()),
            notifying: Mutex::new(None),
            next_id: AtomicU64::new(0),
            policy,
        }
    }

    /// Failure policy applied during notification passes
    pub fn policy(&self) -> NotifyPolicy {
        self.policy
    }

    /// Current state snapshot
    ///
    /// Inside an update handler this is always the value set by the mutation
    /// that triggered the pass.
    pub fn get_state(&self) -> S
    where
        S: Clone,
    {
        self.read_state().clone()
    }

    /// Borrow the current state without cloning it
    ///
    /// The state read lock is held while `f` runs. Calling `set_state` from
    /// inside `f` deadlocks; copy what you need out first.
    pub fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.read_state())
    }

    /// Add an observer to the notification set
    ///
    /// Registering an observer that is already present returns its existing
    /// id and leaves the list untouched.
    pub fn register<O>(&self, observer: &Arc<O>) -> ObserverId
    where
        O: Observer + 'static,
    {
        let weak: Weak<O> = Arc::downgrade(observer);
        self.insert(Arc::as_ptr(observer).cast::<()>(), weak)
    }

    /// [`register`](Self::register) for an already type-erased observer
    pub fn register_dyn(&self, observer: &Arc<dyn Observer>) -> ObserverId {
        self.insert(Arc::as_ptr(observer).cast::<()>(), Arc::downgrade(observer))
    }

    /// Remove an observer; returns whether it was registered
    pub fn unregister<O>(&self, observer: &Arc<O>) -> bool
    where
        O: Observer + ?Sized,
    {
        let address = Arc::as_ptr(observer).cast::<()>();
        self.remove_where(|entry| entry.points_to(address))
    }

    /// Remove an observer by the id it was registered under
    pub fn unregister_id(&self, id: ObserverId) -> bool {
        self.remove_where(|entry| entry.id == id)
    }

    /// Whether the observer is currently registered
    pub fn contains<O>(&self, observer: &Arc<O>) -> bool
    where
        O: Observer + ?Sized,
    {
        let address = Arc::as_ptr(observer).cast::<()>();
        self.lock_observers().iter().any(|entry| entry.points_to(address))
    }

    /// Whether a registration with this id is still present
    pub fn is_registered(&self, id: ObserverId) -> bool {
        self.lock_observers().iter().any(|entry| entry.id == id)
    }

    /// Number of registered observers that are still alive
    pub fn observer_count(&self) -> usize {
        self.lock_observers().iter().filter(|entry| entry.is_alive()).count()
    }

    /// Registration ids in notification order
    pub fn observer_ids(&self) -> Vec<ObserverId> {
        self.lock_observers().iter().map(|entry| entry.id).collect()
    }

    /// Drop every registration
    pub fn clear(&self) {
        let mut observers = self.lock_observers();
        log_trace!("Clearing {} observer registrations", observers.len());
        observers.clear();
    }

    /// Run a notification pass without changing the state
    ///
    /// Like `set_state`, this fails with [`SubjectError::ReentrantPass`] when
    /// called from inside `update()` on the same thread.
    pub fn notify_all(&self) -> SubjectResult<NotifyReport> {
        let _pass = self.begin_pass()?;
        self.run_pass()
    }

    fn insert(&self, address: *const (), observer: Weak<dyn Observer>) -> ObserverId {
        let mut observers = self.lock_observers();
        prune(&mut observers);

        if let Some(existing) = observers.iter().find(|entry| entry.points_to(address)) {
            log_trace!("Observer {} already registered", existing.id);
            return existing.id;
        }

        let id = ObserverId::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed));
        observers.push(Registration { id, observer });
        log_trace!("Registered observer {} ({} total)", id, observers.len());
        id
    }

    fn remove_where(&self, mut matches: impl FnMut(&Registration) -> bool) -> bool {
        let mut observers = self.lock_observers();
        match observers.iter().position(|entry| matches(entry)) {
            Some(index) => {
                let removed = observers.remove(index);
                log_trace!("Unregistered observer {} ({} left)", removed.id, observers.len());
                true
            }
            None => false,
        }
    }

    /// Enter the serialized mutate-and-notify section
    fn begin_pass(&self) -> SubjectResult<PassGuard<'_>> {
        let current = thread::current().id();
        if *lock_recover(&self.notifying) == Some(current) {
            return Err(SubjectError::ReentrantPass);
        }

        let pass = lock_recover(&self.pass);
        *lock_recover(&self.notifying) = Some(current);

        Ok(PassGuard {
            notifying: &self.notifying,
            _pass: pass,
        })
    }

    /// Notify the snapshot of observers taken at pass start
    ///
    /// Caller must hold the pass guard.
    fn run_pass(&self) -> SubjectResult<NotifyReport> {
        let snapshot: Vec<(ObserverId, Weak<dyn Observer>)> = self
            .lock_observers()
            .iter()
            .map(|entry| (entry.id, entry.observer.clone()))
            .collect();

        log_trace!("Notification pass over {} observers", snapshot.len());

        let mut report = NotifyReport::default();
        let mut saw_dropped = false;

        for (id, weak) in snapshot {
            if !self.is_registered(id) {
                report.skipped += 1;
                continue;
            }

            let Some(observer) = weak.upgrade() else {
                saw_dropped = true;
                report.skipped += 1;
                continue;
            };

            if let Err(error) = observer.update() {
                let name = observer.name().to_owned();
                match self.policy {
                    NotifyPolicy::FailFast => {
                        log_warn!("Observer {} ({}) failed, aborting pass: {}", id, name, error);
                        return Err(SubjectError::ObserverFailed { id, name, source: error });
                    }
                    NotifyPolicy::Isolate => {
                        log_warn!("Observer {} ({}) failed, continuing pass: {}", id, name, error);
                        report.failures.push(NotifyFailure { id, name, error });
                    }
                }
            } else {
                report.delivered += 1;
            }
        }

        if saw_dropped {
            self.prune_dropped();
        }

        log_trace!(
            "Notification pass done: {} delivered, {} skipped, {} failed",
            report.delivered,
            report.skipped,
            report.failures.len()
        );

        Ok(report)
    }

    fn prune_dropped(&self) {
        prune(&mut self.lock_observers());
    }

    fn lock_observers(&self) -> MutexGuard<'_, Vec<Registration>> {
        lock_recover(&self.observers)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, S> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, S> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: Validatable> Subject<S> {
    /// Replace the state, then notify every registered observer
    ///
    /// This is the only way the state changes. The new state is validated
    /// first; a rejected state leaves the old one in place and notifies
    /// nobody.
    pub fn set_state(&self, new_state: S) -> SubjectResult<NotifyReport> {
        if !new_state.is_valid() {
            return Err(SubjectError::InvalidState(new_state.rejection_reason()));
        }

        let _pass = self.begin_pass()?;
        *self.write_state() = new_state;
        self.run_pass()
    }
}

impl<S: Default> Default for Subject<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: fmt::Debug> fmt::Debug for Subject<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("state", &*self.read_state())
            .field("observers", &self.observer_ids())
            .field("policy", &self.policy)
            .finish()
    }
}

/// Held for the duration of one notification pass
///
/// Field order matters: the thread marker is cleared in `drop` before the
/// pass lock is released.
struct PassGuard<'a> {
    notifying: &'a Mutex<Option<ThreadId>>,
    _pass: MutexGuard<'a, ()>,
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        *lock_recover(self.notifying) = None;
    }
}

/// Drop registrations whose observer no longer exists
fn prune(observers: &mut Vec<Registration>) {
    let before = observers.len();
    observers.retain(Registration::is_alive);
    if observers.len() < before {
        log_debug!("Pruned {} dropped observers", before - observers.len());
    }
}

fn lock_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
