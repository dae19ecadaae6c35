//! Grid neighbourhoods with precomputed physical step lengths.

use super::point::VoxelCoord;
use super::spacing::Spacing;

/// One move to a neighbouring voxel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeighborStep {
    pub dx: i32,
    pub dy: i32,
    pub dz: i32,
    /// Physical length of the move
    pub length: f64,
}

impl NeighborStep {
    /// Apply this step to a coordinate
    #[inline]
    pub fn apply(&self, coord: VoxelCoord) -> VoxelCoord {
        coord.offset(self.dx, self.dy, self.dz)
    }
}

/// Build the neighbourhood table: 26-connected for volumes, 8-connected for
/// single-slice images. Order is fixed (z, then x, then y) so expansion is
/// reproducible.
pub fn neighborhood(planar: bool, spacing: &Spacing) -> Vec<NeighborStep> {
    let z_range = if planar { 0..=0 } else { -1..=1 };
    let mut steps = Vec::with_capacity(if planar { 8 } else { 26 });

    for dz in z_range {
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 && dz == 0 {
                    continue;
                }
                steps.push(NeighborStep {
                    dx,
                    dy,
                    dz,
                    length: spacing.step_length(dx, dy, dz),
                });
            }
        }
    }

    steps
}
