//! Search node records.

use serde::{Deserialize, Serialize};

use crate::core::VoxelCoord;

/// Which anchor a search wave grows from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    FromStart,
    FromGoal,
}

impl Direction {
    /// The other wave
    pub fn opposite(self) -> Self {
        match self {
            Direction::FromStart => Direction::FromGoal,
            Direction::FromGoal => Direction::FromStart,
        }
    }
}

/// Node state within one direction.
///
/// `Free` is never stored: a coordinate without a record is free.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Free,
    Open,
    Closed,
}

/// Dense index of a node inside its registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// One search record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchNode {
    pub coord: VoxelCoord,
    /// Accumulated cost from this direction's anchor
    pub g: f64,
    /// Heuristic estimate towards the opposite anchor
    pub h: f64,
    /// Previous node on the route back to the anchor (`None` at the anchor)
    pub predecessor: Option<NodeId>,
    pub status: NodeStatus,
}

impl SearchNode {
    /// Priority `g + h`
    #[inline]
    pub fn f(&self) -> f64 {
        self.g + self.h
    }
}
