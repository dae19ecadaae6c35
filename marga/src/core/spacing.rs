//! Per-axis physical voxel spacing (calibration).

use serde::{Deserialize, Serialize};

use super::point::{VoxelCoord, WorldPoint};

/// Physical size of a voxel along each axis, plus the unit it is expressed in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Unit label, e.g. "µm" or "pixel"
    pub unit: String,
}

impl Default for Spacing {
    fn default() -> Self {
        Self::uncalibrated()
    }
}

impl Spacing {
    /// Create a spacing with explicit per-axis sizes
    pub fn new(x: f64, y: f64, z: f64, unit: impl Into<String>) -> Self {
        Self {
            x,
            y,
            z,
            unit: unit.into(),
        }
    }

    /// Unit spacing on every axis, measured in pixels
    pub fn uncalibrated() -> Self {
        Self::new(1.0, 1.0, 1.0, "pixel")
    }

    /// True if every axis is finite and strictly positive
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .all(|s| s.is_finite() && *s > 0.0)
    }

    /// Convert a voxel coordinate to calibrated world coordinates
    #[inline]
    pub fn to_world(&self, coord: VoxelCoord) -> WorldPoint {
        WorldPoint::new(
            coord.x as f64 * self.x,
            coord.y as f64 * self.y,
            coord.z as f64 * self.z,
        )
    }

    /// Physical length of a step of (dx, dy, dz) voxels
    #[inline]
    pub fn step_length(&self, dx: i32, dy: i32, dz: i32) -> f64 {
        let sx = dx as f64 * self.x;
        let sy = dy as f64 * self.y;
        let sz = dz as f64 * self.z;
        (sx * sx + sy * sy + sz * sz).sqrt()
    }

    /// Physical Euclidean distance between two voxels
    #[inline]
    pub fn physical_distance(&self, a: VoxelCoord, b: VoxelCoord) -> f64 {
        self.step_length(a.x - b.x, a.y - b.y, a.z - b.z)
    }

    /// Physical volume of a single voxel
    pub fn voxel_volume(&self) -> f64 {
        self.x * self.y * self.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_anisotropic_distance() {
        let spacing = Spacing::new(0.5, 0.5, 2.0, "µm");
        let d = spacing.physical_distance(VoxelCoord::new(0, 0, 0), VoxelCoord::new(2, 0, 1));
        assert_relative_eq!(d, (1.0f64 + 4.0).sqrt());
    }

    #[test]
    fn test_zero_axis_is_invalid() {
        assert!(Spacing::uncalibrated().is_valid());
        assert!(!Spacing::new(1.0, 0.0, 1.0, "µm").is_valid());
        assert!(!Spacing::new(1.0, 1.0, f64::NAN, "µm").is_valid());
    }
}
