//! Normalized voxel storage.

use log::debug;

use crate::core::{Spacing, VoxelCoord};
use crate::error::VolumeError;

/// Native sample buffers, one value per voxel in `z, y, x` order.
#[derive(Clone, Debug)]
pub enum SampleData {
    U8(Vec<u8>),
    U16(Vec<u16>),
    F32(Vec<f32>),
}

impl SampleData {
    /// Number of samples
    pub fn len(&self) -> usize {
        match self {
            SampleData::U8(v) => v.len(),
            SampleData::U16(v) => v.len(),
            SampleData::F32(v) => v.len(),
        }
    }

    /// True if there are no samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Minimum and maximum sample value (NaNs ignored)
    fn range(&self) -> (f32, f32) {
        fn fold<I: Iterator<Item = f32>>(values: I) -> (f32, f32) {
            values
                .filter(|v| !v.is_nan())
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                    (lo.min(v), hi.max(v))
                })
        }
        let (lo, hi) = match self {
            SampleData::U8(v) => fold(v.iter().map(|&s| s as f32)),
            SampleData::U16(v) => fold(v.iter().map(|&s| s as f32)),
            SampleData::F32(v) => fold(v.iter().copied()),
        };
        if lo > hi { (0.0, 0.0) } else { (lo, hi) }
    }

    fn normalized(&self, stack_min: f32, stack_max: f32) -> Vec<f32> {
        let range = stack_max - stack_min;
        let scale = move |v: f32| -> f32 {
            if range <= 0.0 || v.is_nan() {
                return 0.0;
            }
            (255.0 * (v - stack_min) / range).clamp(0.0, 255.0)
        };
        match self {
            SampleData::U8(v) => v.iter().map(|&s| scale(s as f32)).collect(),
            SampleData::U16(v) => v.iter().map(|&s| scale(s as f32)).collect(),
            SampleData::F32(v) => v.iter().map(|&s| scale(s)).collect(),
        }
    }
}

/// Read-only scalar volume with calibration.
///
/// Values are normalized once, at construction, to [0, 255] using the
/// declared (or observed) stack minimum and maximum.
#[derive(Clone, Debug)]
pub struct VoxelVolume {
    width: usize,
    height: usize,
    depth: usize,
    spacing: Spacing,
    stack_min: f32,
    stack_max: f32,
    values: Vec<f32>,
}

impl VoxelVolume {
    /// Build a volume, taking the stack range from the data itself.
    pub fn new(
        width: usize,
        height: usize,
        depth: usize,
        data: SampleData,
        spacing: Spacing,
    ) -> Result<Self, VolumeError> {
        let (stack_min, stack_max) = data.range();
        Self::with_range(width, height, depth, data, spacing, stack_min, stack_max)
    }

    /// Build a volume using a declared stack range.
    pub fn with_range(
        width: usize,
        height: usize,
        depth: usize,
        data: SampleData,
        spacing: Spacing,
        stack_min: f32,
        stack_max: f32,
    ) -> Result<Self, VolumeError> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(VolumeError::EmptyDimensions {
                width,
                height,
                depth,
            });
        }
        let expected = width
            .checked_mul(height)
            .and_then(|wh| wh.checked_mul(depth))
            .ok_or(VolumeError::TooLarge { voxels: usize::MAX })?;
        // Registry slots are u32 with one sentinel value reserved
        if expected >= u32::MAX as usize || width > i32::MAX as usize || height > i32::MAX as usize
        {
            return Err(VolumeError::TooLarge { voxels: expected });
        }
        if data.len() != expected {
            return Err(VolumeError::SampleCountMismatch {
                expected,
                actual: data.len(),
            });
        }
        if !spacing.is_valid() {
            return Err(VolumeError::InvalidSpacing {
                x: spacing.x,
                y: spacing.y,
                z: spacing.z,
            });
        }

        debug!(
            "[Volume] {}x{}x{} voxels, range [{}, {}], spacing ({}, {}, {}) {}",
            width, height, depth, stack_min, stack_max, spacing.x, spacing.y, spacing.z, spacing.unit
        );

        Ok(Self {
            width,
            height,
            depth,
            values: data.normalized(stack_min, stack_max),
            spacing,
            stack_min,
            stack_max,
        })
    }

    /// 8-bit volume passed through unchanged (declared range 0..255)
    pub fn from_u8(
        width: usize,
        height: usize,
        depth: usize,
        data: Vec<u8>,
        spacing: Spacing,
    ) -> Result<Self, VolumeError> {
        Self::with_range(
            width,
            height,
            depth,
            SampleData::U8(data),
            spacing,
            0.0,
            255.0,
        )
    }

    /// (width, height, depth)
    #[inline]
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Calibration
    #[inline]
    pub fn spacing(&self) -> &Spacing {
        &self.spacing
    }

    /// Declared stack range used for normalization
    pub fn stack_range(&self) -> (f32, f32) {
        (self.stack_min, self.stack_max)
    }

    /// True for single-slice images
    #[inline]
    pub fn is_planar(&self) -> bool {
        self.depth == 1
    }

    /// Total number of voxels
    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.values.len()
    }

    /// Check if a coordinate lies inside the volume
    #[inline]
    pub fn contains(&self, coord: VoxelCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
            && (coord.z as usize) < self.depth
    }

    /// Flattened index `z*w*h + y*w + x`, or `None` outside the volume
    #[inline]
    pub fn flat_index(&self, coord: VoxelCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        Some(
            coord.z as usize * self.width * self.height
                + coord.y as usize * self.width
                + coord.x as usize,
        )
    }

    /// Normalized value in [0, 255]; 0 outside the volume
    #[inline]
    pub fn value_at(&self, coord: VoxelCoord) -> f32 {
        self.flat_index(coord).map_or(0.0, |i| self.values[i])
    }
}
