//! Deferred auto-clear timers
//!
//! Every timer races a sleep against a cancellation token. Tokens are
//! grouped: cancelling the current group stops every timer armed since the
//! last reset, and dropping the [`ClearTimer`] stops all of them.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::OverlapPolicy;

pub(super) struct ClearTimer {
    shutdown: CancellationToken,
    group: Mutex<CancellationToken>,
}

impl ClearTimer {
    pub(super) fn new() -> Self {
        let shutdown = CancellationToken::new();
        let group = Mutex::new(shutdown.child_token());
        Self { shutdown, group }
    }

    fn lock(&self) -> MutexGuard<'_, CancellationToken> {
        self.group.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Token for a newly scheduled timer.
    ///
    /// Under [`OverlapPolicy::Restart`] the previous group is cancelled first,
    /// so at most one timer is ever live.
    pub(super) fn arm(&self, policy: OverlapPolicy) -> CancellationToken {
        let mut group = self.lock();
        if policy == OverlapPolicy::Restart {
            group.cancel();
            *group = self.shutdown.child_token();
        }
        group.child_token()
    }

    /// Cancel every timer armed so far
    pub(super) fn cancel_all(&self) {
        let mut group = self.lock();
        group.cancel();
        *group = self.shutdown.child_token();
    }

    /// Run `on_fire` once `delay` has passed, measured from this call, unless
    /// `token` is cancelled first
    pub(super) fn spawn(
        runtime: &Handle,
        token: CancellationToken,
        delay: Duration,
        on_fire: impl FnOnce() + Send + 'static,
    ) -> JoinHandle<()> {
        // Read the clock of `runtime`, which may be paused or differ from the caller's
        let deadline = {
            let _enter = runtime.enter();
            Instant::now() + delay
        };
        runtime.spawn(async move {
            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    log::debug!("Toast clear timer cancelled");
                }

                _ = tokio::time::sleep_until(deadline) => {
                    on_fire();
                }
            }
        })
    }
}

impl Drop for ClearTimer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
#[path = "clear_timer_tests.rs"]
mod clear_timer_tests;
