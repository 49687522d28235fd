//! Completion and progress notifications
//!
//! Consumers that do not want to block on `wait_for_finished()` can either
//! register a [`ResultObserver`] or read [`ResultEvent`]s from a broadcast
//! receiver. `DataReady` fires zero or more times while rows arrive;
//! `Finished` fires exactly once, after the outcome has been published.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Event emitted by a result while it is being populated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultEvent {
    /// New rows are available; `total_rows` is the row count after they arrived
    DataReady { total_rows: usize },
    /// Execution completed, successfully or not
    Finished,
}

/// Callback interface for result notifications.
///
/// Callbacks run on whichever thread drives the result forward: the producer
/// for buffered results, the caller of `next()` for streaming ones. They must
/// not block.
pub trait ResultObserver: Send + Sync {
    fn on_data_ready(&self, _total_rows: usize) {}

    fn on_finished(&self) {}
}

/// Identifies an observer registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Fan-out point for one result's notifications
pub struct Notifier {
    observers: Mutex<Vec<(Subscription, Arc<dyn ResultObserver>)>>,
    next_id: AtomicU64,
    finished: AtomicBool,
    events: broadcast::Sender<ResultEvent>,
}

impl Notifier {
    pub fn new(event_capacity: usize) -> Self {
        let (events, _rx) = broadcast::channel(event_capacity.max(1));
        Self {
            observers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
            finished: AtomicBool::new(false),
            events,
        }
    }

    /// Register an observer. An observer added after completion receives
    /// `on_finished` immediately.
    pub fn subscribe(&self, observer: Arc<dyn ResultObserver>) -> Subscription {
        let id = Subscription(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut observers = self.observers.lock();
        if self.finished.load(Ordering::Acquire) {
            drop(observers);
            observer.on_finished();
            return id;
        }
        observers.push((id, observer));
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut observers = self.observers.lock();
        let before = observers.len();
        observers.retain(|(id, _)| *id != subscription);
        observers.len() != before
    }

    /// Receiver for events emitted from now on
    pub fn events(&self) -> broadcast::Receiver<ResultEvent> {
        self.events.subscribe()
    }

    pub fn data_ready(&self, total_rows: usize) {
        if self.finished.load(Ordering::Acquire) {
            return;
        }
        let _ = self.events.send(ResultEvent::DataReady { total_rows });
        for observer in self.snapshot() {
            observer.on_data_ready(total_rows);
        }
    }

    /// Emit the completion event. Only the first call has any effect.
    pub fn finished(&self) {
        let observers = {
            let mut observers = self.observers.lock();
            if self.finished.swap(true, Ordering::AcqRel) {
                return;
            }
            std::mem::take(&mut *observers)
        };
        let _ = self.events.send(ResultEvent::Finished);
        for (_, observer) in observers {
            observer.on_finished();
        }
    }

    fn snapshot(&self) -> Vec<Arc<dyn ResultObserver>> {
        self.observers
            .lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("observers", &self.observers.lock().len())
            .field("finished", &self.finished.load(Ordering::Relaxed))
            .finish()
    }
}
