//! Membership graph of voxels covered by previously traced paths.

use std::collections::{HashMap, HashSet};

use crate::core::VoxelCoord;

use super::trace::Path;

/// Voxels of earlier paths, with the links between consecutive points.
///
/// Built once, then shared read-only (typically behind an `Arc`) by
/// open-ended searches that stop growing when they reach existing structure.
#[derive(Clone, Debug, Default)]
pub struct PathGraph {
    points: HashSet<VoxelCoord>,
    links: HashMap<VoxelCoord, Vec<VoxelCoord>>,
}

impl PathGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `current`, linking it to `last` when given
    pub fn add_point(&mut self, current: VoxelCoord, last: Option<VoxelCoord>) {
        self.points.insert(current);
        if let Some(last) = last
            && last != current
        {
            self.points.insert(last);
            Self::link(&mut self.links, current, last);
            Self::link(&mut self.links, last, current);
        }
    }

    /// Add every voxel of a path, linked in order
    pub fn add_path(&mut self, path: &Path) {
        let mut last = None;
        for point in path.points() {
            self.add_point(point.voxel, last);
            last = Some(point.voxel);
        }
    }

    fn link(links: &mut HashMap<VoxelCoord, Vec<VoxelCoord>>, a: VoxelCoord, b: VoxelCoord) {
        let entry = links.entry(a).or_default();
        if !entry.contains(&b) {
            entry.push(b);
        }
    }

    #[inline]
    pub fn contains(&self, coord: VoxelCoord) -> bool {
        self.points.contains(&coord)
    }

    /// Voxels linked to `coord`
    pub fn neighbors(&self, coord: VoxelCoord) -> &[VoxelCoord] {
        self.links
            .get(&coord)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
