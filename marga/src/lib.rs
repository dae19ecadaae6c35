//! # Marga: Minimum-Cost Path Tracing in Image Volumes
//!
//! Finds cheapest routes between points of a 2D image or 3D stack, where the
//! cost of a voxel reflects how likely it is to lie on a bright tubular
//! structure (a neurite in fluorescence microscopy).
//!
//! ## Features
//!
//! - **Bidirectional A\***: two waves meet in the middle with a provably
//!   optimal stopping rule and a deterministic expansion order
//! - **Interchangeable cost models**: reciprocal intensity or Hessian tubeness
//! - **Open-ended growth**: Dijkstra from seeds, collecting destination voxels
//! - **Cancellable, pausable, time-bounded** execution on worker threads
//! - **Path post-processing**: iterative Ramer–Douglas–Peucker simplification
//! - **Pluggable backends**: alternate tracers behind the same result contract
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use marga::core::{Spacing, VoxelCoord};
//! use marga::cost::CostModelKind;
//! use marga::search::{SearchEngine, SearchSettings};
//! use marga::volume::VoxelVolume;
//!
//! # fn main() -> marga::Result<()> {
//! let volume = Arc::new(VoxelVolume::from_u8(
//!     64, 64, 1, vec![128; 64 * 64], Spacing::new(0.3, 0.3, 1.0, "µm"),
//! )?);
//! let cost = CostModelKind::Reciprocal.build(&volume, None, None)?;
//!
//! let mut engine = SearchEngine::goal_directed(
//!     volume,
//!     cost,
//!     VoxelCoord::planar(3, 5),
//!     VoxelCoord::planar(60, 40),
//!     SearchSettings::default(),
//! )?;
//! let result = engine.run();
//! if let Some(path) = result.path() {
//!     println!("{} points, {:.2} {}", path.len(), path.length(), path.unit());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Voxel/world coordinates, calibration, neighbourhoods
//! - [`volume`]: Normalized voxel storage and tubeness inputs
//! - [`cost`]: Voxel traversal cost models
//! - [`search`]: Node registry, frontier, engine, control and worker
//! - [`path`]: Paths, path graphs and simplification
//! - [`external`]: Alternate tracing backends
//! - [`export`]: Fill (search-state) export
//! - [`config`]: YAML configuration
//!
//! ## Data Flow
//!
//! ```text
//!   VoxelVolume ──► CostModel ──► SearchEngine ──► Path ──► simplify
//!   (+ tubeness)                  │   ▲    │
//!                   NodeRegistry ◄┘   │    └──► FillExport
//!                   PriorityFrontier ─┘
//! ```

pub mod config;
pub mod core;
pub mod cost;
pub mod error;
pub mod export;
pub mod external;
pub mod path;
pub mod search;
pub mod volume;

// Re-export main types at crate root
pub use config::{ConfigLoadError, TraceConfig};
pub use cost::{CostModel, CostModelKind};
pub use error::{Result, TraceError, VolumeError};
pub use path::{Path, PathGraph, PathId};
pub use search::{
    SearchControl, SearchEngine, SearchFailure, SearchListener, SearchResult, SearchSettings,
    SearchState, SearchWorker,
};
pub use volume::{SampleData, TubenessField, VoxelVolume};
