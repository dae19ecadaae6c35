//! Path simplification configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Ramer–Douglas–Peucker settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimplifySection {
    /// Simplify paths returned by goal-directed searches
    #[serde(default)]
    pub enabled: bool,

    /// Maximum deviation, in calibrated units
    #[serde(default = "defaults::simplify_epsilon")]
    pub epsilon: f64,
}

impl Default for SimplifySection {
    fn default() -> Self {
        Self {
            enabled: false,
            epsilon: 1.0,
        }
    }
}
