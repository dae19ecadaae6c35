//! Open-ended search configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Destination criteria for open-ended searches
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpenSearchSection {
    /// Tubeness above which a voxel is a destination
    #[serde(default = "defaults::tubeness_threshold")]
    pub tubeness_threshold: f32,

    /// Stop once the cheapest open node costs more than this
    #[serde(default)]
    pub distance_limit: Option<f64>,
}

impl Default for OpenSearchSection {
    fn default() -> Self {
        Self {
            tubeness_threshold: 20.0,
            distance_limit: None,
        }
    }
}
