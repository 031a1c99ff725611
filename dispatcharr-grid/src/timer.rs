//! Cancellable timers.
//!
//! [`schedule`] runs a future after a delay and hands back a [`TimerHandle`]
//! that can cancel it before it fires. [`Debouncer`] keeps at most one
//! pending timer: every new call cancels the outstanding one first, so only
//! the last call in a burst runs.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Quiet period before staged filter edits are committed.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// Handle to a scheduled task.
///
/// Dropping the handle does not cancel the task.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    token: CancellationToken,
}

impl TimerHandle {
    /// Prevents the task from running if it has not fired yet.
    ///
    /// Has no effect once the task has started.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` if [`cancel`](Self::cancel) was called.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Runs `task` on the current tokio runtime after `delay`.
pub fn schedule<F>(delay: Duration, task: F) -> TimerHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    let token = CancellationToken::new();
    let child = token.clone();

    tokio::spawn(async move {
        tokio::select! {
            _ = child.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
        task.await;
    });

    TimerHandle { token }
}

/// Collapses bursts of calls into one delayed run.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<TimerHandle>>,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// The quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancels any pending task and schedules `task` in its place.
    pub fn call<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = pending.take() {
            previous.cancel();
        }
        *pending = Some(schedule(self.delay, task));
    }

    /// Cancels the pending task, if any.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = pending.take() {
            previous.cancel();
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_DELAY)
    }
}
