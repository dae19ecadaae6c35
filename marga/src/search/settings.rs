//! Run-time settings for the search engine.

use std::sync::Arc;
use std::time::Duration;

use crate::core::VoxelCoord;
use crate::path::PathGraph;
use crate::volume::TubenessField;

/// Loop and termination settings shared by both search modes.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchSettings {
    /// Wall-clock budget; zero disables the timeout
    pub timeout: Duration,
    /// Minimum time between progress reports; zero disables reports
    pub report_interval: Duration,
    /// Upper bound on iterations between clock samples; the engine samples
    /// more often when iterations are slow
    pub check_every: usize,
    /// Begin in the paused state, waiting for a resume
    pub start_paused: bool,
    /// Grow from both anchors (goal-directed mode only)
    pub bidirectional: bool,
    /// Simplify the returned path with this tolerance
    pub simplify_epsilon: Option<f64>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::ZERO,
            report_interval: Duration::from_millis(1000),
            check_every: 1000,
            start_paused: false,
            bidirectional: true,
            simplify_epsilon: None,
        }
    }
}

impl SearchSettings {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    pub fn unidirectional(mut self) -> Self {
        self.bidirectional = false;
        self
    }
}

/// What counts as a destination in open-ended mode.
///
/// A voxel qualifies when its tubeness exceeds the threshold or it already
/// lies on a previously traced path. Seeds never qualify.
#[derive(Clone, Debug, Default)]
pub struct DestinationCriteria {
    pub tubeness: Option<Arc<TubenessField>>,
    pub tubeness_threshold: f32,
    pub path_graph: Option<Arc<PathGraph>>,
    /// Stop once the cheapest open node costs more than this
    pub distance_limit: Option<f64>,
}

impl DestinationCriteria {
    pub fn with_tubeness(mut self, field: Arc<TubenessField>, threshold: f32) -> Self {
        self.tubeness = Some(field);
        self.tubeness_threshold = threshold;
        self
    }

    pub fn with_path_graph(mut self, graph: Arc<PathGraph>) -> Self {
        self.path_graph = Some(graph);
        self
    }

    pub fn with_distance_limit(mut self, limit: f64) -> Self {
        self.distance_limit = Some(limit);
        self
    }

    /// Destination predicate
    pub fn matches(&self, coord: VoxelCoord) -> bool {
        if let Some(field) = &self.tubeness
            && field.value_at(coord) > self.tubeness_threshold
        {
            return true;
        }
        self.path_graph.as_ref().is_some_and(|g| g.contains(coord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria_match_either_source() {
        let field = Arc::new(TubenessField::new(3, 1, 1, vec![0.0, 5.0, 1.0]).unwrap());
        let mut graph = PathGraph::new();
        graph.add_point(VoxelCoord::planar(2, 0), None);

        let criteria = DestinationCriteria::default()
            .with_tubeness(field, 2.0)
            .with_path_graph(Arc::new(graph));
        assert!(!criteria.matches(VoxelCoord::planar(0, 0)));
        assert!(criteria.matches(VoxelCoord::planar(1, 0)));
        assert!(criteria.matches(VoxelCoord::planar(2, 0)));
    }

    #[test]
    fn test_empty_criteria_match_nothing() {
        assert!(!DestinationCriteria::default().matches(VoxelCoord::planar(0, 0)));
    }
}
