//! Cross-thread control of a running search.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use super::result::SearchFailure;

/// Lifecycle of a search engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchState {
    Ready,
    Running,
    Paused,
    Succeeded,
    Failed(SearchFailure),
    Cancelled,
}

impl SearchState {
    /// True once the search can no longer change state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SearchState::Succeeded | SearchState::Failed(_) | SearchState::Cancelled
        )
    }
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchState::Ready => write!(f, "ready"),
            SearchState::Running => write!(f, "running"),
            SearchState::Paused => write!(f, "paused"),
            SearchState::Succeeded => write!(f, "succeeded"),
            SearchState::Failed(reason) => write!(f, "failed ({})", reason),
            SearchState::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Shared handle for cancelling, pausing and observing a search.
///
/// The worker polls the cancel and pause flags every iteration and blocks
/// on a condition variable while paused. `pause_requested` mirrors the
/// mutex-guarded flag and is only written with the mutex held.
#[derive(Debug)]
pub struct SearchControl {
    cancelled: AtomicBool,
    pause_requested: AtomicBool,
    paused: Mutex<bool>,
    wake: Condvar,
    state: Mutex<SearchState>,
}

impl Default for SearchControl {
    fn default() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            pause_requested: AtomicBool::new(false),
            paused: Mutex::new(false),
            wake: Condvar::new(),
            state: Mutex::new(SearchState::Ready),
        }
    }
}

impl SearchControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; also releases a paused worker
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
        let _paused = self.paused.lock();
        self.wake.notify_all();
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn pause(&self) {
        self.set_paused(true);
    }

    pub fn resume(&self) {
        self.set_paused(false);
    }

    /// Flip between paused and running; returns true if now paused
    pub fn toggle_pause(&self) -> bool {
        let mut paused = self.paused.lock();
        let now_paused = !*paused;
        self.store_paused(&mut paused, now_paused);
        now_paused
    }

    #[inline]
    pub fn is_pause_requested(&self) -> bool {
        self.pause_requested.load(Ordering::Acquire)
    }

    fn set_paused(&self, value: bool) {
        let mut paused = self.paused.lock();
        self.store_paused(&mut paused, value);
    }

    fn store_paused(&self, paused: &mut bool, value: bool) {
        *paused = value;
        self.pause_requested.store(value, Ordering::Release);
        if !value {
            self.wake.notify_all();
        }
    }

    pub fn state(&self) -> SearchState {
        self.state.lock().clone()
    }

    pub(crate) fn set_state(&self, state: SearchState) {
        *self.state.lock() = state;
    }

    /// Block while paused (until resumed or cancelled); returns time blocked
    pub(crate) fn wait_while_paused(&self) -> Duration {
        let mut paused = self.paused.lock();
        if !*paused {
            return Duration::ZERO;
        }
        let began = Instant::now();
        while *paused && !self.is_cancelled() {
            self.wake.wait(&mut paused);
        }
        began.elapsed()
    }
}
