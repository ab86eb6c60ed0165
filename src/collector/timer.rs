//! Cancellable quiescence timer.

use tokio::task::JoinHandle;

/// Handle to at most one outstanding scheduled flush.
///
/// Aborting the task is best-effort: a timer that already slept through its
/// deadline may be blocked on the state lock when the abort lands. Each armed
/// timer therefore carries a generation number and re-checks it under the
/// lock before acting; a stale generation turns the fired timer into a no-op.
/// Cancelling an already-fired or never-armed timer is itself a no-op.
#[derive(Debug, Default)]
pub(crate) struct DebounceTimer {
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl DebounceTimer {
    /// Cancel any armed timer and invalidate its generation.
    pub(crate) fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    /// Generation the next armed timer should carry.
    pub(crate) fn current_generation(&self) -> u64 {
        self.generation
    }

    /// Record a newly spawned timer task. Any previous timer must have been
    /// cancelled first.
    pub(crate) fn arm(&mut self, handle: JoinHandle<()>) {
        debug_assert!(self.handle.is_none());
        self.handle = Some(handle);
    }

    /// Whether a fired timer's generation is still the live one.
    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Drop the stored handle once the timer has fired on its own.
    pub(crate) fn disarm(&mut self) {
        self.handle = None;
    }
}
