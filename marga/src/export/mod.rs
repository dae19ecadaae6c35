//! Fill (search-state) export for persistence.
//!
//! Nodes are written in sequence with dense ids so `previous_id`
//! back-references resolve within one export.

use serde::{Deserialize, Serialize};

use crate::core::Spacing;
use crate::search::{NodeRegistry, NodeStatus};

/// Whether an exported node had been expanded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStatus {
    Open,
    Closed,
}

/// One exported search node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FillNode {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub previous_id: Option<u32>,
    /// Accumulated cost from the seed
    pub distance: f64,
    pub status: FillStatus,
}

/// Search state within a distance threshold, with aggregate metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FillExport {
    /// Cost model name
    pub metric: String,
    /// Distance threshold applied
    pub threshold: f64,
    /// Physical volume of the exported voxels
    pub volume: f64,
    /// Unit of the physical volume (cubed)
    pub unit: String,
    pub nodes: Vec<FillNode>,
}

impl FillExport {
    /// Export every record with `g <= threshold`, renumbered densely in
    /// registry order.
    pub fn from_registry(
        registry: &NodeRegistry,
        threshold: f64,
        metric: &str,
        spacing: &Spacing,
    ) -> Self {
        let mut dense: Vec<Option<u32>> = vec![None; registry.len()];
        let mut next = 0u32;
        for (id, node) in registry.iter() {
            if node.g <= threshold && node.status != NodeStatus::Free {
                dense[id.index()] = Some(next);
                next += 1;
            }
        }

        let nodes: Vec<FillNode> = registry
            .iter()
            .filter_map(|(id, node)| {
                let new_id = dense[id.index()]?;
                Some(FillNode {
                    id: new_id,
                    x: node.coord.x,
                    y: node.coord.y,
                    z: node.coord.z,
                    previous_id: node.predecessor.and_then(|p| dense[p.index()]),
                    distance: node.g,
                    status: match node.status {
                        NodeStatus::Closed => FillStatus::Closed,
                        _ => FillStatus::Open,
                    },
                })
            })
            .collect();

        Self {
            metric: metric.to_string(),
            threshold,
            volume: nodes.len() as f64 * spacing.voxel_volume(),
            unit: spacing.unit.clone(),
            nodes,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
