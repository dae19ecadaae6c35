//! Tubeness-based cost: voxels that look like bright tubes are cheap.

use std::sync::Arc;

use crate::core::VoxelCoord;
use crate::volume::{Eigenvalues, HessianProvider, TubenessField};

use super::CostModel;

/// Measure used where the voxel is not tube-like (or the field value is
/// zero, negative or NaN)
const NOT_TUBE_MEASURE: f64 = 0.2;

/// Upper clamp on the scaled measure
const MAX_MEASURE: f64 = 256.0;

/// Empirical per-unit lower bound. Calibration constant: it is not derived
/// from the measure clamp, keep it literal unless admissibility is re-derived.
const MIN_COST_PER_UNIT: f64 = 1.0 / 60.0;

/// Where tubeness comes from.
#[derive(Clone)]
pub enum TubenessSource {
    /// Precomputed field with the volume's dimensions
    Field(Arc<TubenessField>),
    /// Eigenvalues computed on demand
    Hessian {
        provider: Arc<dyn HessianProvider>,
        /// Single-slice image: use 2 eigenvalues instead of 3
        planar: bool,
    },
}

impl std::fmt::Debug for TubenessSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TubenessSource::Field(field) => f
                .debug_tuple("Field")
                .field(&field.dimensions())
                .finish(),
            TubenessSource::Hessian { planar, .. } => f
                .debug_struct("Hessian")
                .field("planar", planar)
                .finish_non_exhaustive(),
        }
    }
}

/// Cost from a Hessian-derived tubeness measure.
#[derive(Clone, Debug)]
pub struct TubenessCost {
    source: TubenessSource,
    multiplier: f64,
}

impl TubenessCost {
    pub fn new(source: TubenessSource, multiplier: f64) -> Self {
        Self { source, multiplier }
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Unscaled tubeness measure at a voxel
    fn measure(&self, coord: VoxelCoord) -> f64 {
        match &self.source {
            TubenessSource::Field(field) => {
                let value = field.value_at(coord) as f64;
                if value > 0.0 { value } else { NOT_TUBE_MEASURE }
            }
            TubenessSource::Hessian { provider, planar } => {
                match (provider.hessian_eigenvalues(coord), planar) {
                    // Dominant eigenvalue negative: bright ridge
                    (Eigenvalues::Planar([_, l1]), true) if l1 < 0.0 => l1.abs(),
                    // Two dominant eigenvalues negative: bright tube
                    (Eigenvalues::Volumetric([_, l1, l2]), false) if l1 < 0.0 && l2 < 0.0 => {
                        (l1 * l2).sqrt()
                    }
                    _ => NOT_TUBE_MEASURE,
                }
            }
        }
    }
}

impl CostModel for TubenessCost {
    #[inline]
    fn cost_moving_to(&self, coord: VoxelCoord) -> f64 {
        let measure = (self.measure(coord) * self.multiplier).min(MAX_MEASURE);
        1.0 / measure
    }

    fn minimum_cost_per_unit_distance(&self) -> f64 {
        MIN_COST_PER_UNIT
    }

    fn name(&self) -> &'static str {
        "tubeness"
    }
}
