//! Progress and completion listeners.

use std::time::Duration;

use super::control::SearchState;
use super::result::SearchResult;

/// Snapshot reported while a search runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchProgress {
    /// Rough completion estimate in [0, 1]
    pub fraction_done: f64,
    /// Records created so far
    pub nodes_considered: usize,
    pub nodes_expanded: usize,
    /// Running time excluding pauses
    pub elapsed: Duration,
}

/// Observer of a search.
///
/// Called on the worker thread, never concurrently with itself. Hand-off to
/// another thread is the implementor's job.
pub trait SearchListener: Send + Sync {
    fn on_progress(&self, progress: &SearchProgress);

    fn on_state_changed(&self, _state: &SearchState) {}

    fn on_finished(&self, _result: &SearchResult) {}
}
