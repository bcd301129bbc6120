//! Callback observers with serialized delivery
//!
//! Observers are never invoked while the registry lock is held, so a
//! callback may publish, subscribe or unsubscribe. Values produced while a
//! delivery is in progress are queued and delivered in order by the caller
//! that is already delivering. A new observer's first call goes through the
//! same queue, and it only receives values queued after it joined.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::notification_state::Toast;

pub(super) type Observer = Arc<dyn Fn(Option<&Toast>) + Send + Sync>;

struct Entry {
    id: u64,
    /// Sequence number of the first broadcast this observer receives
    first_seq: u64,
    observer: Observer,
}

enum Delivery {
    /// A slot change, sent to every observer that joined before it was queued
    Broadcast { seq: u64, value: Option<Toast> },
    /// The current value, sent once to a newly registered observer
    Replay { id: u64, value: Option<Toast> },
}

#[derive(Default)]
struct Registry {
    entries: Vec<Entry>,
    next_id: u64,
    next_seq: u64,
    pending: VecDeque<Delivery>,
    delivering: bool,
}

impl Registry {
    fn targets(&self, delivery: Delivery) -> (Option<Toast>, Vec<Observer>) {
        match delivery {
            Delivery::Broadcast { seq, value } => {
                let targets = self
                    .entries
                    .iter()
                    .filter(|entry| entry.first_seq <= seq)
                    .map(|entry| Arc::clone(&entry.observer))
                    .collect();
                (value, targets)
            }
            Delivery::Replay { id, value } => {
                let targets = self
                    .entries
                    .iter()
                    .filter(|entry| entry.id == id)
                    .map(|entry| Arc::clone(&entry.observer))
                    .collect();
                (value, targets)
            }
        }
    }
}

#[derive(Default)]
pub(super) struct Observers {
    registry: Mutex<Registry>,
}

impl Observers {
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `observer` and deliver `current()` to it as its first value.
    ///
    /// `current` is read under the registry lock, so it agrees with every
    /// value already queued.
    pub(super) fn insert(&self, observer: Observer, current: impl FnOnce() -> Option<Toast>) -> u64 {
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        let first_seq = registry.next_seq;
        registry.entries.push(Entry {
            id,
            first_seq,
            observer,
        });
        let value = current();
        registry.pending.push_back(Delivery::Replay { id, value });
        self.deliver(registry);
        id
    }

    /// Returns false if `id` was already removed
    pub(super) fn remove(&self, id: u64) -> bool {
        let mut registry = self.lock();
        let before = registry.entries.len();
        registry.entries.retain(|entry| entry.id != id);
        registry.entries.len() != before
    }

    pub(super) fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Run `update` under the registry lock and deliver the value it yields.
    ///
    /// `update` returns `None` when nothing changed, in which case nobody is
    /// notified. Otherwise it returns the new slot value plus a result that
    /// is handed back to the caller once the value has been queued.
    pub(super) fn update<R>(
        &self,
        update: impl FnOnce() -> Option<(Option<Toast>, R)>,
    ) -> Option<R> {
        let mut registry = self.lock();
        let (value, result) = update()?;
        let seq = registry.next_seq;
        registry.next_seq += 1;
        registry.pending.push_back(Delivery::Broadcast { seq, value });
        self.deliver(registry);
        Some(result)
    }

    /// Drain the queue unless another caller is already draining it
    fn deliver<'a>(&'a self, mut registry: MutexGuard<'a, Registry>) {
        if registry.delivering {
            return;
        }
        registry.delivering = true;

        let guard = DeliveryGuard { observers: self };
        while let Some(delivery) = registry.pending.pop_front() {
            let (value, targets) = registry.targets(delivery);
            drop(registry);
            for observer in &targets {
                observer(value.as_ref());
            }
            registry = self.lock();
        }
        registry.delivering = false;
        drop(registry);
        drop(guard);
    }
}

/// Resets the delivering flag if an observer panics mid-delivery
struct DeliveryGuard<'a> {
    observers: &'a Observers,
}

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut registry = self.observers.lock();
            registry.delivering = false;
            registry.pending.clear();
        }
    }
}

/// Handle returned by [`ToastChannel::subscribe`](super::ToastChannel::subscribe).
///
/// The observer stays registered until the handle is unsubscribed or dropped.
#[derive(Debug)]
#[must_use = "dropping a Subscription unsubscribes its observer"]
pub struct Subscription {
    observers: Weak<Observers>,
    id: u64,
}

impl Subscription {
    pub(super) fn new(observers: &Arc<Observers>, id: u64) -> Self {
        Self {
            observers: Arc::downgrade(observers),
            id,
        }
    }

    /// Stop delivering values to this observer
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(observers) = self.observers.upgrade()
            && observers.remove(self.id)
        {
            log::debug!("Toast observer {} unsubscribed", self.id);
        }
    }
}

#[cfg(test)]
#[path = "observers_tests.rs"]
mod observers_tests;
