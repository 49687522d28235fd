//! One-shot completion hand-off between producer and consumer
//!
//! The error and boolean outcome of an execution are published exactly once
//! through a [`Completion`]. Until then they are not readable at all: the
//! only way to reach an [`Outcome`] is through `Completion::outcome()`, which
//! returns `None` while the result is unfinished.

use crate::QueryError;
use parking_lot::{Condvar, Mutex};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Final state of an execution, readable once the result has finished
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outcome {
    pub error: QueryError,
    /// Answer of an Ask query; false for every other statement type
    pub bool_value: bool,
}

impl Outcome {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn failed(error: QueryError) -> Self {
        Self {
            error,
            bool_value: false,
        }
    }

    pub fn answer(value: bool) -> Self {
        Self {
            error: QueryError::default(),
            bool_value: value,
        }
    }
}

/// Shared completion state. `finished` transitions false to true exactly once.
pub struct Completion {
    outcome: OnceLock<Outcome>,
    lock: Mutex<()>,
    cond: Condvar,
    tx: watch::Sender<bool>,
}

impl Completion {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            outcome: OnceLock::new(),
            lock: Mutex::new(()),
            cond: Condvar::new(),
            tx,
        }
    }

    /// Publish the outcome. Returns false if the result had already finished,
    /// in which case the first outcome is kept.
    pub fn publish(&self, outcome: Outcome) -> bool {
        let _guard = self.lock.lock();
        if self.outcome.set(outcome).is_err() {
            return false;
        }
        self.cond.notify_all();
        self.tx.send_replace(true);
        true
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.get().is_some()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.get()
    }

    /// Block the calling thread until the outcome is published
    pub fn wait(&self) {
        if self.is_finished() {
            return;
        }
        let mut guard = self.lock.lock();
        while !self.is_finished() {
            self.cond.wait(&mut guard);
        }
    }

    /// Block for at most `timeout`. Returns whether the result finished.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.is_finished() {
            return true;
        }
        let deadline = Instant::now() + timeout;
        let mut guard = self.lock.lock();
        while !self.is_finished() {
            if self.cond.wait_until(&mut guard, deadline).timed_out() {
                return self.is_finished();
            }
        }
        true
    }

    /// Resolve once the outcome is published
    pub async fn finished(&self) {
        let mut rx = self.tx.subscribe();
        // the sender lives as long as `self`, so this cannot observe a closed channel
        let _ = rx.wait_for(|done| *done).await;
    }
}

impl Default for Completion {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("outcome", &self.outcome.get())
            .finish()
    }
}

/// Cloneable, future-like handle on a result's completion.
///
/// Handles can be moved to other threads or tasks to wait for a result that
/// is owned elsewhere.
#[derive(Debug, Clone)]
pub struct CompletionHandle {
    inner: Arc<Completion>,
}

impl CompletionHandle {
    pub fn new(inner: Arc<Completion>) -> Self {
        Self { inner }
    }

    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Copy of the outcome, once published
    pub fn outcome(&self) -> Option<Outcome> {
        self.inner.outcome().cloned()
    }

    pub fn wait(&self) {
        self.inner.wait();
    }

    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.inner.wait_timeout(timeout)
    }

    pub async fn finished(&self) {
        self.inner.finished().await;
    }
}
