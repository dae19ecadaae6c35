//! Search loop configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Search loop settings section
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchSection {
    /// Wall-clock budget in seconds (0 = no timeout)
    #[serde(default)]
    pub timeout_secs: f64,

    /// Minimum milliseconds between progress reports (0 = never)
    #[serde(default = "defaults::report_interval_ms")]
    pub report_interval_ms: u64,

    /// Iterations between clock samples
    #[serde(default = "defaults::check_every")]
    pub check_every: usize,

    /// Grow from both anchors in goal-directed mode
    #[serde(default = "defaults::enabled")]
    pub bidirectional: bool,

    /// Start paused, waiting for resume
    #[serde(default)]
    pub start_paused: bool,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            timeout_secs: 0.0,
            report_interval_ms: 1000,
            check_every: 1000,
            bidirectional: true,
            start_paused: false,
        }
    }
}
