//! Voxel traversal cost models.
//!
//! A cost model answers two questions for the search engine:
//! - how expensive is it, per unit of physical distance, to enter a voxel
//! - what is the cheapest that could ever be (drives the A* heuristic)
//!
//! Two models are provided:
//! - [`IntensityCost`]: reciprocal (or inverted) normalized intensity
//! - [`TubenessCost`]: reciprocal of a Hessian-derived tubeness measure

mod intensity;
mod tubeness;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::VoxelCoord;
use crate::error::{Result, TraceError};
use crate::volume::{HessianProvider, TubenessField, VoxelVolume};

pub use intensity::{IntensityCost, IntensityMapping};
pub use tubeness::{TubenessCost, TubenessSource};

/// Per-step traversal cost derived from volume data.
///
/// Implementations are read-only and shared between search threads.
pub trait CostModel: Send + Sync {
    /// Cost per unit distance of moving into `coord`.
    ///
    /// The engine multiplies this by the physical step length.
    fn cost_moving_to(&self, coord: VoxelCoord) -> f64;

    /// Lower bound on `cost_moving_to` over any voxel.
    ///
    /// Multiplied by a Euclidean distance this must never exceed the true
    /// remaining cost, otherwise the search loses optimality.
    fn minimum_cost_per_unit_distance(&self) -> f64;

    /// Metric name recorded in fill exports
    fn name(&self) -> &'static str;
}

/// Cost model selection (configuration-facing).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CostModelKind {
    /// `1 / value`
    #[default]
    Reciprocal,
    /// `255 - value`
    Inverted,
    /// Reciprocal of scaled tubeness
    Tubeness { multiplier: f64 },
}

impl CostModelKind {
    /// Build the selected model.
    ///
    /// For [`CostModelKind::Tubeness`] a precomputed field is preferred over the
    /// Hessian provider when both are supplied.
    pub fn build(
        &self,
        volume: &Arc<VoxelVolume>,
        field: Option<Arc<TubenessField>>,
        hessian: Option<Arc<dyn HessianProvider>>,
    ) -> Result<Arc<dyn CostModel>> {
        match *self {
            CostModelKind::Reciprocal => Ok(Arc::new(IntensityCost::new(
                Arc::clone(volume),
                IntensityMapping::Reciprocal,
            ))),
            CostModelKind::Inverted => Ok(Arc::new(IntensityCost::new(
                Arc::clone(volume),
                IntensityMapping::Inverted,
            ))),
            CostModelKind::Tubeness { multiplier } => {
                let source = match (field, hessian) {
                    (Some(field), _) => {
                        if field.dimensions() != volume.dimensions() {
                            return Err(TraceError::TubenessDimensions {
                                field: field.dimensions(),
                                volume: volume.dimensions(),
                            });
                        }
                        TubenessSource::Field(field)
                    }
                    (None, Some(provider)) => TubenessSource::Hessian {
                        provider,
                        planar: volume.is_planar(),
                    },
                    (None, None) => return Err(TraceError::MissingTubeness),
                };
                Ok(Arc::new(TubenessCost::new(source, multiplier)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Spacing;

    fn volume() -> Arc<VoxelVolume> {
        Arc::new(VoxelVolume::from_u8(2, 2, 1, vec![1, 2, 3, 4], Spacing::uncalibrated()).unwrap())
    }

    #[test]
    fn test_build_intensity_models() {
        let v = volume();
        let reciprocal = CostModelKind::Reciprocal.build(&v, None, None).unwrap();
        assert_eq!(reciprocal.name(), "reciprocal");
        let inverted = CostModelKind::Inverted.build(&v, None, None).unwrap();
        assert_eq!(inverted.name(), "inverted");
    }

    #[test]
    fn test_tubeness_requires_source() {
        let v = volume();
        let kind = CostModelKind::Tubeness { multiplier: 4.0 };
        assert!(matches!(
            kind.build(&v, None, None),
            Err(TraceError::MissingTubeness)
        ));

        let wrong = Arc::new(TubenessField::new(3, 2, 1, vec![0.0; 6]).unwrap());
        assert!(matches!(
            kind.build(&v, Some(wrong), None),
            Err(TraceError::TubenessDimensions { .. })
        ));

        let field = Arc::new(TubenessField::new(2, 2, 1, vec![1.0; 4]).unwrap());
        let model = kind.build(&v, Some(field), None).unwrap();
        assert_eq!(model.name(), "tubeness");
    }

    #[test]
    fn test_kind_yaml() {
        let kind: CostModelKind = serde_yaml::from_str("kind: tubeness\nmultiplier: 50.0").unwrap();
        assert_eq!(kind, CostModelKind::Tubeness { multiplier: 50.0 });
        let kind: CostModelKind = serde_yaml::from_str("kind: reciprocal").unwrap();
        assert_eq!(kind, CostModelKind::Reciprocal);
    }
}
