//! Traced paths: ordered calibrated points with voxel provenance.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::core::{Spacing, VoxelCoord, WorldPoint};

use super::simplify::simplify_indices;

static NEXT_PATH_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide stable path identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathId(u64);

impl PathId {
    /// Allocate a fresh identifier
    pub fn next() -> Self {
        PathId(NEXT_PATH_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// One point along a path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// Voxel the point was traced through
    pub voxel: VoxelCoord,
    /// Calibrated position (voxel × spacing)
    pub position: WorldPoint,
    /// Estimated radius, if fitted
    pub radius: Option<f64>,
}

/// Where a path endpoint joins another path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathJoin {
    pub path: PathId,
    pub point: WorldPoint,
}

/// Ordered route through the volume.
///
/// Before simplification consecutive points are grid neighbours.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Path {
    id: PathId,
    spacing: Spacing,
    points: Vec<PathPoint>,
    start_join: Option<PathJoin>,
    end_join: Option<PathJoin>,
    length: f64,
}

impl Path {
    /// Empty path with the given calibration
    pub fn new(spacing: Spacing) -> Self {
        Self {
            id: PathId::next(),
            spacing,
            points: Vec::new(),
            start_join: None,
            end_join: None,
            length: 0.0,
        }
    }

    /// Path through the given voxels, in order
    pub fn from_voxels(voxels: &[VoxelCoord], spacing: Spacing) -> Self {
        let mut path = Self::new(spacing);
        path.points.reserve(voxels.len());
        for &voxel in voxels {
            path.push(voxel);
        }
        path
    }

    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn spacing(&self) -> &Spacing {
        &self.spacing
    }

    /// Unit label of the calibrated coordinates
    pub fn unit(&self) -> &str {
        &self.spacing.unit
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn first(&self) -> Option<&PathPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PathPoint> {
        self.points.last()
    }

    /// Voxel coordinates along the path
    pub fn voxels(&self) -> Vec<VoxelCoord> {
        self.points.iter().map(|p| p.voxel).collect()
    }

    /// Calibrated positions along the path
    pub fn positions(&self) -> Vec<WorldPoint> {
        self.points.iter().map(|p| p.position).collect()
    }

    /// Total calibrated length (cached)
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Append a voxel to the end of the path
    pub fn push(&mut self, voxel: VoxelCoord) {
        let position = self.spacing.to_world(voxel);
        if let Some(last) = self.points.last() {
            self.length += last.position.distance(&position);
        }
        self.points.push(PathPoint {
            voxel,
            position,
            radius: None,
        });
    }

    /// Concatenate `other` onto the end of this path.
    ///
    /// If `other` starts where this path ends the shared point is kept once.
    /// The end join is taken from `other`.
    pub fn append(&mut self, other: &Path) {
        let skip = match (self.points.last(), other.points.first()) {
            (Some(a), Some(b)) if a.voxel == b.voxel => 1,
            _ => 0,
        };
        for point in other.points.iter().skip(skip) {
            if let Some(last) = self.points.last() {
                self.length += last.position.distance(&point.position);
            }
            self.points.push(*point);
        }
        self.end_join = other.end_join;
    }

    /// Same route walked backwards, as a new path
    pub fn reversed(&self) -> Path {
        let mut points = self.points.clone();
        points.reverse();
        Path {
            id: PathId::next(),
            spacing: self.spacing.clone(),
            points,
            start_join: self.end_join,
            end_join: self.start_join,
            length: self.length,
        }
    }

    /// True if every consecutive pair of points are grid neighbours
    pub fn is_connected(&self) -> bool {
        self.points
            .windows(2)
            .all(|w| w[0].voxel.is_adjacent(&w[1].voxel))
    }

    /// Sparse copy keeping only the points selected by Ramer–Douglas–Peucker.
    ///
    /// Keeps the identifier and joins; endpoints are always retained.
    pub fn simplified(&self, epsilon: f64) -> Path {
        let positions = self.positions();
        let points: Vec<PathPoint> = simplify_indices(&positions, epsilon)
            .into_iter()
            .map(|i| self.points[i])
            .collect();
        let length = points
            .windows(2)
            .map(|w| w[0].position.distance(&w[1].position))
            .sum();
        Path {
            id: self.id,
            spacing: self.spacing.clone(),
            points,
            start_join: self.start_join,
            end_join: self.end_join,
            length,
        }
    }

    /// Attach a radius estimate to a point
    pub fn set_radius(&mut self, index: usize, radius: f64) {
        if let Some(point) = self.points.get_mut(index) {
            point.radius = Some(radius);
        }
    }

    pub fn start_join(&self) -> Option<&PathJoin> {
        self.start_join.as_ref()
    }

    pub fn end_join(&self) -> Option<&PathJoin> {
        self.end_join.as_ref()
    }

    pub fn set_start_join(&mut self, join: Option<PathJoin>) {
        self.start_join = join;
    }

    pub fn set_end_join(&mut self, join: Option<PathJoin>) {
        self.end_join = join;
    }
}
