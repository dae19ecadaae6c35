//! Read-only image volumes and tubeness inputs.
//!
//! A [`VoxelVolume`] stores every voxel already normalized to the common
//! [0, 255] cost range, whatever the native sample width was. Cost models
//! read that single representation and never dispatch on sample type.
//!
//! Tubeness is consumed in one of two forms:
//! - [`TubenessField`]: a precomputed field with the volume's dimensions
//! - [`HessianProvider`]: an on-demand eigenvalue capability supplied by the
//!   caller (the curvature estimation itself lives outside this crate)

mod storage;
mod tubeness;

pub use storage::{SampleData, VoxelVolume};
pub use tubeness::{Eigenvalues, HessianProvider, TubenessField};
