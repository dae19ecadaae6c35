//! Trace a synthetic neurite through a noisy 3D stack.
//!
//! Builds a dark, noisy volume containing a bright helical tube, traces it
//! between its two ends on a worker thread, then grows an open-ended fill
//! around the traced path and optionally writes it as JSON.
//!
//! Usage:
//!   cargo run --example trace_synthetic
//!   cargo run --example trace_synthetic -- --config configs/marga.yaml --fill-out fill.json

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::info;
use rand::prelude::*;

use marga::core::{Spacing, VoxelCoord};
use marga::search::{SearchProgress, SearchWorker};
use marga::{
    SampleData, SearchEngine, SearchListener, SearchResult, SearchState, TraceConfig, VoxelVolume,
};

/// Synthetic tracing demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to configs/marga.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Volume edge length in voxels
    #[arg(short, long, default_value_t = 96)]
    size: usize,

    /// Random seed for background noise
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Cost limit for the fill around the traced path
    #[arg(long, default_value_t = 0.05)]
    fill_limit: f64,

    /// Write the fill export here
    #[arg(long)]
    fill_out: Option<PathBuf>,
}

struct LogListener;

impl SearchListener for LogListener {
    fn on_progress(&self, progress: &SearchProgress) {
        info!(
            "{:5.1}% after {:?} ({} expanded)",
            progress.fraction_done * 100.0,
            progress.elapsed,
            progress.nodes_expanded
        );
    }

    fn on_state_changed(&self, state: &SearchState) {
        info!("state: {}", state);
    }

    fn on_finished(&self, result: &SearchResult) {
        info!(
            "finished: success={} expanded={} in {:?}",
            result.success(),
            result.nodes_expanded,
            result.elapsed
        );
    }
}

/// Helix centre at parameter `t` in [0, 1]
fn helix(size: usize, t: f64) -> VoxelCoord {
    let c = size as f64 / 2.0;
    let r = size as f64 / 4.0;
    let angle = t * std::f64::consts::TAU * 1.5;
    let depth = (size / 4) as f64;
    VoxelCoord::new(
        (c + r * angle.cos()).round() as i32,
        (c + r * angle.sin()).round() as i32,
        (t * (depth - 1.0)).round() as i32,
    )
}

fn synthetic_volume(size: usize, seed: u64) -> marga::Result<VoxelVolume> {
    let depth = size / 4;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data: Vec<u16> = (0..size * size * depth)
        .map(|_| rng.gen_range(100..900))
        .collect();

    let samples = size * 20;
    for i in 0..=samples {
        let centre = helix(size, i as f64 / samples as f64);
        for dz in -1..=1 {
            for dy in -2..=2 {
                for dx in -2..=2 {
                    let v = centre.offset(dx, dy, dz);
                    if v.x < 0 || v.y < 0 || v.z < 0 {
                        continue;
                    }
                    let (x, y, z) = (v.x as usize, v.y as usize, v.z as usize);
                    if x < size && y < size && z < depth {
                        let falloff = (dx * dx + dy * dy) as u16;
                        data[z * size * size + y * size + x] = 4000 - falloff * 300;
                    }
                }
            }
        }
    }

    Ok(VoxelVolume::new(
        size,
        size,
        depth,
        SampleData::U16(data),
        Spacing::new(0.2, 0.2, 0.8, "µm"),
    )?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if args.size < 8 {
        return Err("volume edge must be at least 8 voxels".into());
    }

    let config = match &args.config {
        Some(path) => TraceConfig::load(path)?,
        None => TraceConfig::load_default()?,
    };

    let volume = Arc::new(synthetic_volume(args.size, args.seed)?);
    let cost = config.cost.build(&volume, None, None)?;
    let start = helix(args.size, 0.0);
    let goal = helix(args.size, 1.0);
    info!("tracing {} -> {}", start, goal);

    let mut engine = SearchEngine::goal_directed(
        Arc::clone(&volume),
        Arc::clone(&cost),
        start,
        goal,
        config.to_search_settings(),
    )?;
    engine.add_listener(Arc::new(LogListener));
    let (_, result) = SearchWorker::spawn(engine)?.join()?;

    let Some(path) = result.path() else {
        println!("No path: {:?}", result.failure());
        return Ok(());
    };
    println!(
        "Path: {} points, {:.2} {}, cost {:.4}",
        path.len(),
        path.length(),
        path.unit(),
        result.cost.unwrap_or_default()
    );
    let sparse = path.simplified(0.5);
    println!("Simplified (0.5 {}): {} points", path.unit(), sparse.len());

    let criteria = config
        .to_destination_criteria(None, None)
        .with_distance_limit(args.fill_limit);
    let mut fill = SearchEngine::open_ended(
        Arc::clone(&volume),
        cost,
        path.voxels(),
        criteria,
        config.to_search_settings(),
    )?;
    let fill_result = fill.run();
    println!(
        "Fill: {} voxels expanded within cost {}",
        fill_result.nodes_expanded, args.fill_limit
    );

    if let Some(out) = &args.fill_out
        && let Some(export) = fill.export_fill(args.fill_limit)
    {
        std::fs::write(out, export.to_json()?)?;
        println!(
            "Wrote {} fill nodes ({:.3} {}³) to {}",
            export.len(),
            export.volume,
            export.unit,
            out.display()
        );
    }

    Ok(())
}
