//! Open-ended (Dijkstra) searches, destinations and fill export.

mod common;

use std::sync::Arc;

use marga::core::{Spacing, VoxelCoord};
use marga::cost::CostModelKind;
use marga::export::{FillExport, FillStatus};
use marga::search::{DestinationCriteria, SearchEngine, SearchSettings};
use marga::{Path, PathGraph, TraceError, TubenessField, VoxelVolume};

use common::{bright_row_image, init_logging, uniform_volume};

fn row_field(width: usize, height: usize, row: usize) -> Arc<TubenessField> {
    let mut values = vec![0.0f32; width * height];
    for x in 0..width {
        values[row * width + x] = 100.0;
    }
    Arc::new(TubenessField::new(width, height, 1, values).unwrap())
}

fn open_engine(
    volume: Arc<VoxelVolume>,
    seeds: Vec<VoxelCoord>,
    criteria: DestinationCriteria,
) -> SearchEngine {
    let cost = CostModelKind::Reciprocal.build(&volume, None, None).unwrap();
    SearchEngine::open_ended(volume, cost, seeds, criteria, SearchSettings::default()).unwrap()
}

#[test]
fn test_exhaustive_fill_visits_every_voxel() {
    init_logging();
    let volume = uniform_volume(12, 9, 3, 40);
    let count = volume.voxel_count();
    let mut engine = open_engine(
        volume,
        vec![VoxelCoord::new(5, 4, 1)],
        DestinationCriteria::default(),
    );
    let result = engine.run();
    assert!(result.success());
    assert!(result.path().is_none());
    assert_eq!(result.nodes_expanded, count);
    assert_eq!(result.nodes_considered, count);
    assert!(engine.destinations().is_empty());
}

#[test]
fn test_tubeness_destinations_exclude_seeds() {
    let (w, h) = (20, 10);
    let volume = bright_row_image(w, h, 7);
    let seed = VoxelCoord::planar(4, 7);
    let criteria = DestinationCriteria::default().with_tubeness(row_field(w, h, 7), 50.0);
    let mut engine = open_engine(volume, vec![seed], criteria);
    assert!(engine.run().success());

    let destinations = engine.destinations();
    assert_eq!(destinations.len(), w - 1);
    assert!(destinations.iter().all(|d| d.y == 7));
    assert!(!destinations.contains(&seed));
}

#[test]
fn test_path_back_reaches_seed() {
    let volume = bright_row_image(30, 12, 6);
    let seed = VoxelCoord::planar(2, 2);
    let mut engine = open_engine(volume, vec![seed], DestinationCriteria::default());
    engine.run();

    let target = VoxelCoord::planar(27, 6);
    let path: Path = engine.path_back(target).unwrap();
    assert_eq!(path.first().unwrap().voxel, seed);
    assert_eq!(path.last().unwrap().voxel, target);
    assert!(path.is_connected());
    // Cheapest route rides the bright row for most of the way
    let on_row = path.voxels().iter().filter(|v| v.y == 6).count();
    assert!(on_row > 15);

    assert!(engine.path_back(VoxelCoord::planar(30, 0)).is_none());
}

#[test]
fn test_path_graph_destinations() {
    let volume = uniform_volume(16, 16, 1, 100);
    let existing: Vec<_> = (3..13).map(|y| VoxelCoord::planar(12, y)).collect();
    let mut graph = PathGraph::new();
    graph.add_path(&Path::from_voxels(&existing, Spacing::uncalibrated()));

    let criteria = DestinationCriteria::default().with_path_graph(Arc::new(graph));
    let mut engine = open_engine(volume, vec![VoxelCoord::planar(2, 8)], criteria);
    engine.run();

    let mut found = engine.destinations().to_vec();
    found.sort();
    assert_eq!(found, existing);
}

#[test]
fn test_multiple_seeds_share_one_wave() {
    let volume = uniform_volume(21, 1, 1, 255);
    let seeds = vec![VoxelCoord::planar(0, 0), VoxelCoord::planar(20, 0)];
    let mut engine = open_engine(volume, seeds, DestinationCriteria::default());
    engine.run();

    // The middle voxel is equidistant; every other voxel routes to its nearest seed
    let left = engine.path_back(VoxelCoord::planar(8, 0)).unwrap();
    assert_eq!(left.first().unwrap().voxel, VoxelCoord::planar(0, 0));
    let right = engine.path_back(VoxelCoord::planar(13, 0)).unwrap();
    assert_eq!(right.first().unwrap().voxel, VoxelCoord::planar(20, 0));
}

#[test]
fn test_distance_limit_and_fill_export() {
    let volume = uniform_volume(40, 40, 1, 255);
    let limit = 10.0 / 255.0;
    let criteria = DestinationCriteria::default().with_distance_limit(limit);
    let mut engine = open_engine(volume, vec![VoxelCoord::planar(20, 20)], criteria);
    let result = engine.run();
    assert!(result.success());
    assert!(result.nodes_expanded < 40 * 40);

    let export: FillExport = engine.export_fill(limit).unwrap();
    assert_eq!(export.metric, "reciprocal");
    assert!(!export.is_empty());
    assert!(export.nodes.iter().all(|n| n.distance <= limit));
    assert!((export.volume - export.len() as f64).abs() < 1e-12);
    assert_eq!(export.unit, "pixel");

    let seeds: Vec<_> = export
        .nodes
        .iter()
        .filter(|n| n.previous_id.is_none())
        .collect();
    assert_eq!(seeds.len(), 1);
    assert_eq!(seeds[0].status, FillStatus::Closed);
    assert!(export.nodes.iter().any(|n| n.status == FillStatus::Closed));

    for node in &export.nodes {
        if let Some(previous) = node.previous_id {
            let parent = &export.nodes[previous as usize];
            let a = VoxelCoord::new(node.x, node.y, node.z);
            let b = VoxelCoord::new(parent.x, parent.y, parent.z);
            assert!(a.is_adjacent(&b));
            assert!(parent.distance < node.distance);
        }
    }

    let parsed = FillExport::from_json(&export.to_json().unwrap()).unwrap();
    assert_eq!(parsed, export);
}

#[test]
fn test_construction_errors() {
    let volume = uniform_volume(8, 8, 1, 10);
    let cost = CostModelKind::Reciprocal.build(&volume, None, None).unwrap();

    let no_seeds = SearchEngine::open_ended(
        Arc::clone(&volume),
        Arc::clone(&cost),
        Vec::new(),
        DestinationCriteria::default(),
        SearchSettings::default(),
    );
    assert!(matches!(no_seeds, Err(TraceError::NoSeeds)));

    let outside = SearchEngine::open_ended(
        Arc::clone(&volume),
        Arc::clone(&cost),
        vec![VoxelCoord::planar(8, 0)],
        DestinationCriteria::default(),
        SearchSettings::default(),
    );
    assert!(matches!(outside, Err(TraceError::OutOfBounds(_))));

    let wrong_field = DestinationCriteria::default().with_tubeness(row_field(9, 8, 0), 1.0);
    let mismatched = SearchEngine::open_ended(
        volume,
        cost,
        vec![VoxelCoord::planar(0, 0)],
        wrong_field,
        SearchSettings::default(),
    );
    assert!(matches!(
        mismatched,
        Err(TraceError::TubenessDimensions { .. })
    ));
}
