//! Cooperative cancellation shared between a signal handler and the live
//! poller

use std::{
    sync::{Arc, Condvar, Mutex},
    time::{Duration, Instant},
};

/// A cloneable cancellation flag. Every clone observes the same state.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl Cancellation {
    /// Returns a new, untripped Cancellation
    pub fn new() -> Self {
        Self::default()
    }

    /// Trips the flag and wakes every waiter
    pub fn cancel(&self) {
        let (lock, cvar) = &*self.inner;
        // a poisoned flag still holds a usable bool
        let mut cancelled = lock.lock().unwrap_or_else(|e| e.into_inner());
        *cancelled = true;
        cvar.notify_all();
    }

    /// Returns true once [`Cancellation::cancel`] has been called
    pub fn is_cancelled(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Blocks for up to `timeout`, returning early with `true` if cancelled.
    /// A timeout too large to represent as a deadline waits for cancellation
    /// only.
    pub fn wait(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut cancelled = lock.lock().unwrap_or_else(|e| e.into_inner());

        let Some(deadline) = Instant::now().checked_add(timeout) else {
            while !*cancelled {
                cancelled =
                    cvar.wait(cancelled).unwrap_or_else(|e| e.into_inner());
            }
            return true;
        };

        while !*cancelled {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            cancelled = match cvar.wait_timeout(cancelled, remaining) {
                Ok((guard, _)) => guard,
                Err(e) => e.into_inner().0,
            };
        }

        *cancelled
    }
}

#[cfg(test)]
#[path = "./cancel_tests.rs"]
mod tests;
