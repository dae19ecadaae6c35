//! Intensity-based cost: bright voxels are cheap to traverse.

use std::sync::Arc;

use crate::core::VoxelCoord;
use crate::volume::VoxelVolume;

use super::CostModel;

/// Stand-in value for zero intensity, keeps the reciprocal finite
const ZERO_INTENSITY_FUDGE: f64 = 0.5;

/// Cheapest per-unit cost: reciprocal of the brightest normalized value.
/// Calibration constant, kept literal.
const MIN_COST_PER_UNIT: f64 = 1.0 / 255.0;

/// How normalized intensity maps to cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntensityMapping {
    /// `1 / value`, with zero replaced by 0.5
    Reciprocal,
    /// `255 - value`
    Inverted,
}

/// Cost from normalized voxel intensity.
#[derive(Clone, Debug)]
pub struct IntensityCost {
    volume: Arc<VoxelVolume>,
    mapping: IntensityMapping,
}

impl IntensityCost {
    pub fn new(volume: Arc<VoxelVolume>, mapping: IntensityMapping) -> Self {
        Self { volume, mapping }
    }

    /// Reciprocal-intensity model (the default)
    pub fn reciprocal(volume: Arc<VoxelVolume>) -> Self {
        Self::new(volume, IntensityMapping::Reciprocal)
    }

    pub fn mapping(&self) -> IntensityMapping {
        self.mapping
    }
}

impl CostModel for IntensityCost {
    #[inline]
    fn cost_moving_to(&self, coord: VoxelCoord) -> f64 {
        let value = self.volume.value_at(coord) as f64;
        match self.mapping {
            IntensityMapping::Reciprocal => {
                if value == 0.0 {
                    1.0 / ZERO_INTENSITY_FUDGE
                } else {
                    1.0 / value
                }
            }
            IntensityMapping::Inverted => 255.0 - value,
        }
    }

    fn minimum_cost_per_unit_distance(&self) -> f64 {
        MIN_COST_PER_UNIT
    }

    fn name(&self) -> &'static str {
        match self.mapping {
            IntensityMapping::Reciprocal => "reciprocal",
            IntensityMapping::Inverted => "inverted",
        }
    }
}
