//! Single-flight reentrancy guard.
//!
//! The settlement entry point holds the guard for its whole duration. A
//! venue that calls back into `settle` while the outer call is still running
//! finds the guard busy and is refused before any funds move.

use std::sync::atomic::{AtomicBool, Ordering};

use paysettle_types::{PaysettleError, Result};

/// `Idle` / `Busy` flag with scoped acquisition.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    busy: AtomicBool,
}

impl ReentrancyGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `Idle → Busy`. The returned token moves `Busy → Idle` when it is
    /// dropped, on every exit path.
    ///
    /// # Errors
    /// Returns [`PaysettleError::ReentrancyDetected`] if already busy.
    pub fn enter(&self) -> Result<GuardToken<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| PaysettleError::ReentrancyDetected)?;
        Ok(GuardToken { guard: self })
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Proof of holding the guard. Releases it on drop.
#[derive(Debug)]
#[must_use = "the guard is released as soon as the token is dropped"]
pub struct GuardToken<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}
