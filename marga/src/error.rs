//! Error types for marga.
//!
//! Search outcomes never use these: a running search reports failure through
//! [`crate::search::SearchFailure`]. These cover construction and setup.

use std::any::Any;

use thiserror::Error;

use crate::config::ConfigLoadError;
use crate::core::VoxelCoord;

/// Errors raised while building a [`crate::volume::VoxelVolume`] or tubeness field
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VolumeError {
    #[error("Volume dimensions must be non-zero, got {width}x{height}x{depth}")]
    EmptyDimensions {
        width: usize,
        height: usize,
        depth: usize,
    },

    #[error("Expected {expected} samples for the declared dimensions, got {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },

    #[error("Calibration has a zero or non-finite axis: ({x}, {y}, {z})")]
    InvalidSpacing { x: f64, y: f64, z: f64 },

    #[error("Volume is too large to index ({voxels} voxels)")]
    TooLarge { voxels: usize },
}

/// Crate-level error type
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Volume error: {0}")]
    Volume(#[from] VolumeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigLoadError),

    #[error("Tubeness cost model selected but no tubeness field or Hessian provider supplied")]
    MissingTubeness,

    #[error("Tubeness field is {field:?} but the volume is {volume:?}")]
    TubenessDimensions {
        field: (usize, usize, usize),
        volume: (usize, usize, usize),
    },

    #[error("Open-ended search needs at least one seed")]
    NoSeeds,

    #[error("Coordinate {0} lies outside the volume")]
    OutOfBounds(VoxelCoord),

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Worker thread panicked")]
    WorkerPanicked,
}

pub type Result<T> = std::result::Result<T, TraceError>;

/// Text carried by a caught panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
