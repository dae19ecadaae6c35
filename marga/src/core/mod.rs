//! Core types shared by every marga module.
//!
//! - [`VoxelCoord`] and [`WorldPoint`]: grid and calibrated coordinates
//! - [`Spacing`]: per-axis physical voxel size
//! - [`neighborhood`]: 8/26-connected move tables

mod neighbors;
mod point;
mod spacing;

pub use neighbors::{NeighborStep, neighborhood};
pub use point::{VoxelCoord, WorldPoint};
pub use spacing::Spacing;
