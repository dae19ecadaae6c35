//! Test utilities for marga.
//!
//! Synthetic volumes, a reference Dijkstra and a recording listener.

#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use marga::core::{Spacing, VoxelCoord, neighborhood};
use marga::search::{SearchListener, SearchProgress, SearchResult, SearchState};
use marga::{CostModel, VoxelVolume};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Volume of uniformly random 8-bit values.
pub fn random_volume(
    width: usize,
    height: usize,
    depth: usize,
    seed: u64,
    spacing: Spacing,
) -> Arc<VoxelVolume> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<u8> = (0..width * height * depth).map(|_| rng.r#gen()).collect();
    Arc::new(VoxelVolume::from_u8(width, height, depth, data, spacing).unwrap())
}

/// Every voxel holds the same value.
pub fn uniform_volume(width: usize, height: usize, depth: usize, value: u8) -> Arc<VoxelVolume> {
    Arc::new(
        VoxelVolume::from_u8(
            width,
            height,
            depth,
            vec![value; width * height * depth],
            Spacing::uncalibrated(),
        )
        .unwrap(),
    )
}

/// Dark planar image with a bright horizontal line at row `row`.
pub fn bright_row_image(width: usize, height: usize, row: usize) -> Arc<VoxelVolume> {
    let mut data = vec![5u8; width * height];
    for x in 0..width {
        data[row * width + x] = 250;
    }
    Arc::new(VoxelVolume::from_u8(width, height, 1, data, Spacing::uncalibrated()).unwrap())
}

#[derive(Clone, Copy)]
struct Queued {
    g: f64,
    coord: VoxelCoord,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .g
            .total_cmp(&self.g)
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Forward cost of entering `coord` over a step of `length`
fn step_cost(cost: &dyn CostModel, coord: VoxelCoord, length: f64) -> f64 {
    cost.cost_moving_to(coord)
        .max(cost.minimum_cost_per_unit_distance())
        * length
}

/// Independent unidirectional Dijkstra over the same edge costs.
pub fn reference_cost(
    volume: &VoxelVolume,
    cost: &dyn CostModel,
    start: VoxelCoord,
    goal: VoxelCoord,
) -> Option<f64> {
    let steps = neighborhood(volume.is_planar(), volume.spacing());
    let mut best = vec![f64::INFINITY; volume.voxel_count()];
    let mut heap = BinaryHeap::new();
    best[volume.flat_index(start)?] = 0.0;
    heap.push(Queued {
        g: 0.0,
        coord: start,
    });

    while let Some(Queued { g, coord }) = heap.pop() {
        if coord == goal {
            return Some(g);
        }
        if g > best[volume.flat_index(coord)?] {
            continue;
        }
        for step in &steps {
            let next = step.apply(coord);
            let Some(index) = volume.flat_index(next) else {
                continue;
            };
            let candidate = g + step_cost(cost, next, step.length);
            if candidate < best[index] {
                best[index] = candidate;
                heap.push(Queued {
                    g: candidate,
                    coord: next,
                });
            }
        }
    }
    None
}

/// Forward cost of walking a voxel route.
pub fn route_cost(volume: &VoxelVolume, cost: &dyn CostModel, voxels: &[VoxelCoord]) -> f64 {
    voxels
        .windows(2)
        .map(|w| {
            let d = w[1] - w[0];
            step_cost(cost, w[1], volume.spacing().step_length(d.x, d.y, d.z))
        })
        .sum()
}

/// Listener that records everything it hears.
#[derive(Default)]
pub struct RecordingListener {
    pub progress: Mutex<Vec<SearchProgress>>,
    pub states: Mutex<Vec<SearchState>>,
    pub finished: Mutex<Vec<bool>>,
}

impl SearchListener for RecordingListener {
    fn on_progress(&self, progress: &SearchProgress) {
        self.progress.lock().push(*progress);
    }

    fn on_state_changed(&self, state: &SearchState) {
        self.states.lock().push(state.clone());
    }

    fn on_finished(&self, result: &SearchResult) {
        self.finished.lock().push(result.success());
    }
}
