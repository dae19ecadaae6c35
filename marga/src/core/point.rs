//! Voxel and world coordinate types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Integer voxel coordinate (column, row, slice).
///
/// The derived ordering is lexicographic on `(x, y, z)`. Search frontiers
/// rely on it to break priority ties deterministically.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct VoxelCoord {
    /// X coordinate (column index)
    pub x: i32,
    /// Y coordinate (row index)
    pub y: i32,
    /// Z coordinate (slice index, 0 for planar images)
    pub z: i32,
}

impl VoxelCoord {
    /// Create a new voxel coordinate
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Create a coordinate in the single slice of a planar image
    #[inline]
    pub const fn planar(x: i32, y: i32) -> Self {
        Self { x, y, z: 0 }
    }

    /// Coordinate displaced by the given offset
    #[inline]
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Chebyshev distance (max per-axis difference)
    #[inline]
    pub fn chebyshev_distance(&self, other: &VoxelCoord) -> i32 {
        (self.x - other.x)
            .abs()
            .max((self.y - other.y).abs())
            .max((self.z - other.z).abs())
    }

    /// True if `other` is one of the 26 grid neighbours of this voxel
    #[inline]
    pub fn is_adjacent(&self, other: &VoxelCoord) -> bool {
        self.chebyshev_distance(other) == 1
    }
}

impl Add for VoxelCoord {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        VoxelCoord::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for VoxelCoord {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        VoxelCoord::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

/// Continuous point in calibrated (physical) units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPoint {
    /// Create a new world point
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Origin
    pub const ZERO: WorldPoint = WorldPoint {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &WorldPoint) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared distance (avoids sqrt)
    #[inline]
    pub fn distance_squared(&self, other: &WorldPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Dot product, treating both points as vectors
    #[inline]
    pub fn dot(&self, other: &WorldPoint) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product, treating both points as vectors
    #[inline]
    pub fn cross(&self, other: &WorldPoint) -> WorldPoint {
        WorldPoint::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Squared vector length
    #[inline]
    pub fn norm_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Vector length
    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }
}

impl Sub for WorldPoint {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        WorldPoint::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Add for WorldPoint {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        WorldPoint::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_voxel_ordering_is_lexicographic() {
        let mut coords = vec![
            VoxelCoord::new(1, 0, 0),
            VoxelCoord::new(0, 2, 0),
            VoxelCoord::new(0, 1, 5),
            VoxelCoord::new(0, 1, 2),
        ];
        coords.sort();
        assert_eq!(
            coords,
            vec![
                VoxelCoord::new(0, 1, 2),
                VoxelCoord::new(0, 1, 5),
                VoxelCoord::new(0, 2, 0),
                VoxelCoord::new(1, 0, 0),
            ]
        );
    }

    #[test]
    fn test_adjacency() {
        let c = VoxelCoord::new(5, 5, 5);
        assert!(c.is_adjacent(&VoxelCoord::new(6, 4, 5)));
        assert!(c.is_adjacent(&VoxelCoord::new(4, 4, 4)));
        assert!(!c.is_adjacent(&c));
        assert!(!c.is_adjacent(&VoxelCoord::new(7, 5, 5)));
    }

    #[test]
    fn test_world_point_distance() {
        let a = WorldPoint::ZERO;
        let b = WorldPoint::new(2.0, 3.0, 6.0);
        assert_relative_eq!(a.distance(&b), 7.0);
    }

    #[test]
    fn test_cross_product() {
        let x = WorldPoint::new(1.0, 0.0, 0.0);
        let y = WorldPoint::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), WorldPoint::new(0.0, 0.0, 1.0));
    }
}
