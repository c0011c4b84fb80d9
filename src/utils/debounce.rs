//! Idle timers
//!
//! `Debouncer` runs a task only after a quiet period: every `trigger` aborts
//! the pending task and re-arms the timer. Used for free-text search and
//! editor auto-save.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Runs the most recently triggered task after `delay` of inactivity
#[derive(Debug)]
pub struct Debouncer {
    name: &'static str,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(name: &'static str, delay: Duration) -> Self {
        Self {
            name,
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer with `task`, replacing any task still waiting.
    ///
    /// Only the wait is cancellable: once the delay elapses the task is
    /// detached and runs to completion even if the timer is re-armed.
    pub fn trigger<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        });

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
            debug!(debouncer = self.name, "Re-armed idle timer");
        }
    }

    /// Drop the pending task without running it
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = pending.take() {
            handle.abort();
            debug!(debouncer = self.name, "Cancelled idle timer");
        }
    }

    /// Whether a task is armed and has not finished yet
    pub fn is_pending(&self) -> bool {
        let pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
