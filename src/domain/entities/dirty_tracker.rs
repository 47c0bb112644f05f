//! Debounce state shared between the change observer and the resync loop.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Records when the watched tree last became dirty.
///
/// A flip-flop, not a queue: every mark overwrites the previous timestamp,
/// so the settle window always runs from the newest actionable change.
/// Clean is `None`, dirty is `Some(since)`, which keeps the dirty flag and
/// its timestamp from ever disagreeing.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    dirty_since: Mutex<Option<Instant>>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the tree dirty as of `now`. Last write wins.
    pub fn mark_dirty(&self, now: Instant) {
        *self.lock() = Some(now);
    }

    pub fn is_dirty(&self) -> bool {
        self.lock().is_some()
    }

    /// Instant of the most recent mark, `None` while clean.
    pub fn dirty_since(&self) -> Option<Instant> {
        *self.lock()
    }

    /// Time since the most recent mark, `None` while clean.
    ///
    /// Saturates at zero when `now` precedes the mark (a mark can land
    /// between the caller sampling the clock and taking the lock).
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        self.lock().map(|since| now.saturating_duration_since(since))
    }

    /// Back to clean. Idempotent.
    pub fn reset(&self) {
        *self.lock() = None;
    }

    /// Back to clean only if nothing was marked after `since`.
    ///
    /// Returns `false` when a newer mark arrived, in which case the tracker
    /// stays dirty with that newer timestamp.
    pub fn reset_unless_newer(&self, since: Instant) -> bool {
        let mut state = self.lock();
        match *state {
            Some(current) if current > since => false,
            _ => {
                *state = None;
                true
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Instant>> {
        // The guarded value is a plain Option; a panic elsewhere cannot leave
        // it half-written.
        self.dirty_since
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
