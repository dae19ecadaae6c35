//! Open set ordered by priority with lazy deletion.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::VoxelCoord;

use super::node::NodeStatus;
use super::registry::NodeRegistry;

/// Queued expansion candidate.
///
/// Decrease-key is done by pushing a fresh entry; the older one becomes stale.
#[derive(Clone, Copy, Debug)]
pub struct FrontierEntry {
    pub f: f64,
    pub g: f64,
    pub coord: VoxelCoord,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behaviour: lowest f first, then lowest coordinate
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FrontierEntry {
    /// True if the registry still holds this entry's record as open
    #[inline]
    fn is_live(&self, registry: &NodeRegistry) -> bool {
        registry
            .get(self.coord)
            .is_some_and(|n| n.status == NodeStatus::Open && n.g == self.g)
    }
}

/// Priority queue for one search direction.
#[derive(Debug, Default)]
pub struct PriorityFrontier {
    heap: BinaryHeap<FrontierEntry>,
    stale_dropped: usize,
}

impl PriorityFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: FrontierEntry) {
        self.heap.push(entry);
    }

    /// Queued entries, stale ones included
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of superseded entries discarded so far
    pub fn stale_dropped(&self) -> usize {
        self.stale_dropped
    }

    fn drop_stale(&mut self, registry: &NodeRegistry) {
        while let Some(top) = self.heap.peek() {
            if top.is_live(registry) {
                break;
            }
            self.heap.pop();
            self.stale_dropped += 1;
        }
    }

    /// Cheapest live entry, discarding stale ones on the way
    pub fn peek_live(&mut self, registry: &NodeRegistry) -> Option<FrontierEntry> {
        self.drop_stale(registry);
        self.heap.peek().copied()
    }

    /// Remove and return the cheapest live entry
    pub fn pop_live(&mut self, registry: &NodeRegistry) -> Option<FrontierEntry> {
        self.drop_stale(registry);
        self.heap.pop()
    }
}
