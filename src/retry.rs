//! Cancellable retry scheduling for the marker overlay.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Doubling back-off with explicit caps on both the per-attempt delay and
/// the number of attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetrySchedule {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl RetrySchedule {
    /// The sleep before each retry: initial, doubled per attempt, clamped
    /// at `max_delay`, at most `max_attempts` entries.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let max_delay = self.max_delay;
        std::iter::successors(Some(self.initial_delay), move |previous| {
            Some((*previous * 2).min(max_delay))
        })
        .take(self.max_attempts as usize)
    }
}

/// Shared flag used to abandon an in-flight overlay when navigation has
/// already moved on.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
