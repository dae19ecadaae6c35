//! Search outcomes.

use std::time::Duration;

use thiserror::Error;

use crate::path::Path;

/// Why a search did not produce a path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchFailure {
    #[error("No path: frontier exhausted without a meeting point")]
    NoPath,

    #[error("Search timed out")]
    TimedOut,

    #[error("Search cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Tracing backend unavailable: {0}")]
    BackendUnavailable(String),
}

/// Outcome of one search run plus diagnostic counters.
///
/// A path and a failure reason are never returned together.
#[derive(Clone, Debug)]
pub struct SearchResult {
    outcome: Result<Option<Path>, SearchFailure>,
    /// Nodes moved to the closed set
    pub nodes_expanded: usize,
    /// Records created across all registries
    pub nodes_considered: usize,
    /// Closed nodes reopened by a strictly cheaper route
    pub nodes_reopened: usize,
    /// Running time, excluding time spent paused
    pub elapsed: Duration,
    /// Accumulated cost of the returned path
    pub cost: Option<f64>,
}

impl SearchResult {
    pub(crate) fn new(outcome: Result<Option<Path>, SearchFailure>, elapsed: Duration) -> Self {
        Self {
            outcome,
            nodes_expanded: 0,
            nodes_considered: 0,
            nodes_reopened: 0,
            elapsed,
            cost: None,
        }
    }

    /// Failed result without counters
    pub fn failed(reason: SearchFailure, elapsed: Duration) -> Self {
        Self::new(Err(reason), elapsed)
    }

    /// Successful result carrying a path
    pub fn found(path: Path, elapsed: Duration) -> Self {
        Self::new(Ok(Some(path)), elapsed)
    }

    /// True unless the search failed.
    ///
    /// An exhaustive open-ended search succeeds without a path.
    pub fn success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn path(&self) -> Option<&Path> {
        self.outcome.as_ref().ok().and_then(Option::as_ref)
    }

    pub fn failure(&self) -> Option<&SearchFailure> {
        self.outcome.as_ref().err()
    }

    pub fn outcome(&self) -> &Result<Option<Path>, SearchFailure> {
        &self.outcome
    }

    pub fn into_path(self) -> Option<Path> {
        self.outcome.ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Spacing, VoxelCoord};

    #[test]
    fn test_failure_has_no_path() {
        let result = SearchResult::failed(SearchFailure::TimedOut, Duration::from_secs(1));
        assert!(!result.success());
        assert!(result.path().is_none());
        assert_eq!(result.failure(), Some(&SearchFailure::TimedOut));
    }

    #[test]
    fn test_found_has_no_failure() {
        let path = Path::from_voxels(&[VoxelCoord::planar(0, 0)], Spacing::uncalibrated());
        let result = SearchResult::found(path, Duration::ZERO);
        assert!(result.success());
        assert!(result.failure().is_none());
        assert_eq!(result.into_path().map(|p| p.len()), Some(1));
    }

    #[test]
    fn test_failure_messages() {
        let failure = SearchFailure::BackendUnavailable("native tracer".into());
        assert_eq!(
            failure.to_string(),
            "Tracing backend unavailable: native tracer"
        );
    }
}
