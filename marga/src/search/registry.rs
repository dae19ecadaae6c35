//! Per-direction node storage with O(1) coordinate lookup.

use log::debug;

use crate::core::VoxelCoord;

use super::node::{Direction, NodeId, NodeStatus, SearchNode};
use super::result::SearchFailure;

/// Slot value marking a voxel without a record
const EMPTY_SLOT: u32 = u32::MAX;

/// Arena of search nodes for one direction.
///
/// A slot table with one entry per voxel (flattened `z·w·h + y·w + x`) points
/// into a dense node vector, so lookups never hash. Node indices are stable
/// for the lifetime of the registry.
///
/// Coordinates must be checked against the volume bounds before any call.
#[derive(Debug)]
pub struct NodeRegistry {
    direction: Direction,
    width: usize,
    height: usize,
    depth: usize,
    slots: Vec<u32>,
    nodes: Vec<SearchNode>,
}

impl NodeRegistry {
    /// Allocate the slot table for a `width × height × depth` volume.
    ///
    /// Allocation failure is reported, not aborted on.
    pub fn allocate(
        direction: Direction,
        (width, height, depth): (usize, usize, usize),
    ) -> Result<Self, SearchFailure> {
        let voxels = width * height * depth;
        let mut slots = Vec::new();
        slots.try_reserve_exact(voxels).map_err(|e| {
            SearchFailure::InternalError(format!(
                "cannot allocate node registry for {} voxels: {}",
                voxels, e
            ))
        })?;
        slots.resize(voxels, EMPTY_SLOT);

        debug!(
            "[Registry] {:?}: {} slots ({}x{}x{})",
            direction, voxels, width, height, depth
        );

        Ok(Self {
            direction,
            width,
            height,
            depth,
            slots,
            nodes: Vec::new(),
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    fn slot_index(&self, coord: VoxelCoord) -> usize {
        debug_assert!(
            coord.x >= 0
                && coord.y >= 0
                && coord.z >= 0
                && (coord.x as usize) < self.width
                && (coord.y as usize) < self.height
                && (coord.z as usize) < self.depth,
            "registry lookup outside volume: {}",
            coord
        );
        coord.z as usize * self.width * self.height
            + coord.y as usize * self.width
            + coord.x as usize
    }

    /// Id of the record at `coord`, if any
    #[inline]
    pub fn id_of(&self, coord: VoxelCoord) -> Option<NodeId> {
        match self.slots[self.slot_index(coord)] {
            EMPTY_SLOT => None,
            id => Some(NodeId(id)),
        }
    }

    /// Record at `coord`, if any
    #[inline]
    pub fn get(&self, coord: VoxelCoord) -> Option<&SearchNode> {
        self.id_of(coord).map(|id| &self.nodes[id.index()])
    }

    /// Status at `coord` (`Free` when there is no record)
    pub fn status(&self, coord: VoxelCoord) -> NodeStatus {
        self.get(coord).map_or(NodeStatus::Free, |n| n.status)
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.index()]
    }

    /// Insert or overwrite the record at `coord`, keeping its id
    pub fn upsert(
        &mut self,
        coord: VoxelCoord,
        g: f64,
        h: f64,
        predecessor: Option<NodeId>,
        status: NodeStatus,
    ) -> Result<NodeId, SearchFailure> {
        let record = SearchNode {
            coord,
            g,
            h,
            predecessor,
            status,
        };
        let slot = self.slot_index(coord);
        if let Some(id) = self.id_of(coord) {
            self.nodes[id.index()] = record;
            return Ok(id);
        }

        self.nodes.try_reserve(1).map_err(|e| {
            SearchFailure::InternalError(format!(
                "cannot grow node registry past {} nodes: {}",
                self.nodes.len(),
                e
            ))
        })?;
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(record);
        self.slots[slot] = id.0;
        Ok(id)
    }

    pub fn set_status(&mut self, id: NodeId, status: NodeStatus) {
        self.nodes[id.index()].status = status;
    }

    /// Number of records (nodes considered)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Records in insertion (id) order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SearchNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Coordinates from `coord` back to this direction's anchor, inclusive.
    ///
    /// `None` if `coord` has no record or the chain is malformed.
    pub fn trace_back(&self, coord: VoxelCoord) -> Option<Vec<VoxelCoord>> {
        let mut current = self.id_of(coord)?;
        let mut chain = vec![coord];
        while let Some(previous) = self.node(current).predecessor {
            if chain.len() > self.nodes.len() {
                return None;
            }
            chain.push(self.node(previous).coord);
            current = previous;
        }
        Some(chain)
    }
}
