//! Shared toast channel
//!
//! Holds zero-or-one current toast. Publishing stores the toast, notifies
//! observers and schedules an automatic clear after [`DEFAULT_CLEAR_DELAY`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;

use super::clear_timer::ClearTimer;
use super::notification_state::{Toast, ToastKind};
use super::observers::{Observers, Subscription};
use crate::config::{OverlapPolicy, ToastConfig};
use crate::error::ToastError;

/// How long a toast stays visible
pub const DEFAULT_CLEAR_DELAY: Duration = Duration::from_millis(3000);

struct Shared {
    slot: watch::Sender<Option<Toast>>,
    observers: Arc<Observers>,
    timer: ClearTimer,
    /// Bumped on every publish. Only touched inside `Observers::update`
    /// closures, which run under the registry lock
    generation: AtomicU64,
    overlap: OverlapPolicy,
    runtime: Handle,
}

/// Handle to the shared toast slot.
///
/// Clones are cheap and all refer to the same slot. Pass one to every
/// component that publishes or displays toasts.
#[derive(Clone)]
pub struct ToastChannel {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for ToastChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastChannel")
            .field("current", &*self.shared.slot.borrow())
            .field("overlap", &self.shared.overlap)
            .finish()
    }
}

impl ToastChannel {
    /// Create a channel on the tokio runtime the caller is running in
    pub fn new(config: &ToastConfig) -> Result<Self, ToastError> {
        let runtime = Handle::try_current().map_err(|_| ToastError::NoRuntime)?;
        Ok(Self::with_handle(runtime, config))
    }

    /// Create a channel whose clear timers run on `runtime`
    pub fn with_handle(runtime: Handle, config: &ToastConfig) -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            shared: Arc::new(Shared {
                slot,
                observers: Arc::new(Observers::default()),
                timer: ClearTimer::new(),
                generation: AtomicU64::new(0),
                overlap: config.overlap,
                runtime,
            }),
        }
    }

    /// Show `message` and schedule it to be cleared after [`DEFAULT_CLEAR_DELAY`]
    pub fn publish(&self, message: impl Into<String>, kind: ToastKind) {
        let toast = Toast::new(message, kind);
        log::debug!("Publishing {} toast: {:?}", toast.kind, toast.message);

        // Arm before storing so a clear scheduled by an earlier publish is
        // already cancelled when observers see the new toast.
        let token = self.shared.timer.arm(self.shared.overlap);
        let generation = self
            .shared
            .observers
            .update(|| {
                let generation = self.shared.generation.fetch_add(1, Ordering::Relaxed) + 1;
                self.shared.slot.send_replace(Some(toast.clone()));
                Some((Some(toast), generation))
            })
            .unwrap_or_default();

        let weak = Arc::downgrade(&self.shared);
        ClearTimer::spawn(
            &self.shared.runtime,
            token,
            DEFAULT_CLEAR_DELAY,
            move || clear_expired(&weak, generation),
        );
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(message, ToastKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(message, ToastKind::Error);
    }

    /// Clear the current toast now and cancel any pending clear
    pub fn dismiss(&self) {
        self.shared.timer.cancel_all();
        if self.shared.clear() {
            log::debug!("Toast dismissed");
        }
    }

    /// Register `observer`, calling it immediately with the current value and
    /// again on every change until the returned [`Subscription`] is dropped
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(Option<&Toast>) + Send + Sync + 'static,
    {
        let id = self
            .shared
            .observers
            .insert(Arc::new(observer), || self.current());
        log::debug!("Toast observer {} subscribed", id);

        Subscription::new(&self.shared.observers, id)
    }

    /// Async view of the slot; new receivers see the current value first
    pub fn watch(&self) -> watch::Receiver<Option<Toast>> {
        self.shared.slot.subscribe()
    }

    pub fn current(&self) -> Option<Toast> {
        self.shared.slot.borrow().clone()
    }

    pub fn is_active(&self) -> bool {
        self.shared.slot.borrow().is_some()
    }

    pub fn observer_count(&self) -> usize {
        self.shared.observers.len()
    }

    pub fn overlap_policy(&self) -> OverlapPolicy {
        self.shared.overlap
    }
}

impl Shared {
    /// Empty the slot; returns false if it was already empty
    fn clear(&self) -> bool {
        self.clear_if(|| true)
    }

    fn clear_if(&self, still_current: impl FnOnce() -> bool) -> bool {
        self.observers
            .update(|| {
                if !still_current() {
                    return None;
                }
                let changed = self.slot.send_if_modified(|current| current.take().is_some());
                changed.then_some((None, ()))
            })
            .is_some()
    }
}

/// Timer callback: clear the toast published as `generation`
fn clear_expired(shared: &Weak<Shared>, generation: u64) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let cleared = match shared.overlap {
        OverlapPolicy::Restart => {
            shared.clear_if(|| shared.generation.load(Ordering::Relaxed) == generation)
        }
        OverlapPolicy::Independent => shared.clear(),
    };
    if cleared {
        log::debug!("Toast {} cleared after {:?}", generation, DEFAULT_CLEAR_DELAY);
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod channel_tests;
