//! Benchmark search and simplification performance.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::prelude::*;

use marga::core::{Spacing, VoxelCoord, WorldPoint};
use marga::path::simplify_polyline;
use marga::{CostModelKind, SearchEngine, SearchSettings, VoxelVolume};

/// Noisy planar image with a bright diagonal ridge.
fn ridge_image(size: usize, seed: u64) -> Arc<VoxelVolume> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data: Vec<u8> = (0..size * size).map(|_| rng.gen_range(1..80)).collect();
    for i in 0..size {
        for w in 0..3 {
            let x = (i + w).min(size - 1);
            data[i * size + x] = 240;
        }
    }
    Arc::new(VoxelVolume::from_u8(size, size, 1, data, Spacing::uncalibrated()).unwrap())
}

fn noisy_stack(size: usize, depth: usize, seed: u64) -> Arc<VoxelVolume> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<u8> = (0..size * size * depth)
        .map(|_| rng.gen_range(1..=255))
        .collect();
    Arc::new(
        VoxelVolume::from_u8(size, size, depth, data, Spacing::new(0.3, 0.3, 1.0, "µm")).unwrap(),
    )
}

fn bench_bidirectional_vs_unidirectional(c: &mut Criterion) {
    let mut group = c.benchmark_group("ridge_trace");
    let volume = ridge_image(256, 11);
    let cost = CostModelKind::Reciprocal.build(&volume, None, None).unwrap();
    let start = VoxelCoord::planar(2, 2);
    let goal = VoxelCoord::planar(250, 250);

    for (label, settings) in [
        ("bidirectional", SearchSettings::default()),
        ("unidirectional", SearchSettings::default().unidirectional()),
    ] {
        let mut engine = SearchEngine::goal_directed(
            Arc::clone(&volume),
            Arc::clone(&cost),
            start,
            goal,
            settings,
        )
        .unwrap();

        group.bench_function(label, |b| {
            b.iter(|| {
                let result = engine.run();
                black_box(result.cost)
            })
        });
    }

    group.finish();
}

fn bench_stack_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("stack_trace");
    group.sample_size(10);

    for size in [32usize, 64, 96].iter() {
        let volume = noisy_stack(*size, 16, 5);
        let cost = CostModelKind::Reciprocal.build(&volume, None, None).unwrap();
        let far = *size as i32 - 1;
        let mut engine = SearchEngine::goal_directed(
            volume,
            cost,
            VoxelCoord::new(0, 0, 0),
            VoxelCoord::new(far, far, 15),
            SearchSettings::default(),
        )
        .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let result = engine.run();
                black_box(result.nodes_expanded)
            })
        });
    }

    group.finish();
}

fn bench_simplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("simplify");

    for n in [1_000usize, 10_000, 100_000].iter() {
        let points: Vec<WorldPoint> = (0..*n)
            .map(|i| {
                let t = i as f64 * 0.01;
                WorldPoint::new(t, (t * 3.0).sin() * 5.0, (t * 0.7).cos())
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, points| {
            b.iter(|| {
                let simplified = simplify_polyline(black_box(points), black_box(0.05));
                black_box(simplified.len())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_bidirectional_vs_unidirectional,
    bench_stack_sizes,
    bench_simplify
);
criterion_main!(benches);
