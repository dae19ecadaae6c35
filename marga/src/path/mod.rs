//! Traced paths and their post-processing.
//!
//! - [`Path`]: ordered calibrated route with joins and a cached length
//! - [`PathGraph`]: membership set of voxels from earlier paths
//! - [`simplify_polyline`]: Ramer–Douglas–Peucker reduction to a sparse polyline

mod graph;
mod simplify;
mod trace;

pub use graph::PathGraph;
pub use simplify::{perpendicular_distance, simplify_indices, simplify_polyline};
pub use trace::{Path, PathId, PathJoin, PathPoint};
