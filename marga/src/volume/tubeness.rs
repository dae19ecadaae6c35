//! Tubeness inputs: precomputed field or on-demand Hessian eigenvalues.

use crate::core::VoxelCoord;
use crate::error::VolumeError;

/// Precomputed tubeness measure, one value per voxel, same layout as the volume.
#[derive(Clone, Debug)]
pub struct TubenessField {
    width: usize,
    height: usize,
    depth: usize,
    values: Vec<f32>,
}

impl TubenessField {
    /// Wrap a field of `width * height * depth` values in `z, y, x` order
    pub fn new(
        width: usize,
        height: usize,
        depth: usize,
        values: Vec<f32>,
    ) -> Result<Self, VolumeError> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(VolumeError::EmptyDimensions {
                width,
                height,
                depth,
            });
        }
        let expected = width * height * depth;
        if values.len() != expected {
            return Err(VolumeError::SampleCountMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            width,
            height,
            depth,
            values,
        })
    }

    /// (width, height, depth)
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }

    /// Tubeness at a voxel; 0 outside the field
    #[inline]
    pub fn value_at(&self, coord: VoxelCoord) -> f32 {
        if coord.x < 0
            || coord.y < 0
            || coord.z < 0
            || coord.x as usize >= self.width
            || coord.y as usize >= self.height
            || coord.z as usize >= self.depth
        {
            return 0.0;
        }
        let idx = coord.z as usize * self.width * self.height
            + coord.y as usize * self.width
            + coord.x as usize;
        self.values[idx]
    }
}

/// Local Hessian eigenvalues, sorted by ascending absolute value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Eigenvalues {
    /// 2D image: two eigenvalues
    Planar([f64; 2]),
    /// 3D volume: three eigenvalues
    Volumetric([f64; 3]),
    /// Estimation failed at this voxel
    Invalid,
}

/// External curvature-estimation capability.
///
/// Implementations must be safe to query from several search threads at once.
pub trait HessianProvider: Send + Sync {
    /// Eigenvalues of the Hessian at `coord`
    fn hessian_eigenvalues(&self, coord: VoxelCoord) -> Eigenvalues;
}
