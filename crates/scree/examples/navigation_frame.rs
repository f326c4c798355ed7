//! End-to-end navigation frame example.
//!
//! Demonstrates: build the full filter pipeline → run frames against a
//! synthetic elevation map → drop the goal and path → read the layers.
//!
//! Run with `RUST_LOG=scree_plugin=debug` to see the degradation events.

use scree::prelude::*;
use scree::filters::layers;

const CELL_N: usize = 60;
const RES: f32 = 0.05;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scree_plugin=info".parse().unwrap()),
        )
        .init();

    println!("=== scree navigation frame ===\n");

    let shape = GridShape::square(CELL_N);
    let config = PipelineConfig::new(shape)
        .with_plugin(DistanceFilter::builder().shape(shape).build().unwrap())
        .with_plugin(InflationFilter::builder().shape(shape).radius(4).build().unwrap())
        .with_plugin(ObstacleAngleFilter::builder().shape(shape).build().unwrap())
        .with_plugin(PathDistanceFilter::builder().shape(shape).build().unwrap())
        .with_plugin(PathAngleFilter::builder().shape(shape).build().unwrap())
        .with_plugin(GoalDistanceFilter::builder().shape(shape).build().unwrap())
        .with_plugin(CostFilter::builder().shape(shape).build().unwrap());
    let mut pipeline = Pipeline::new(config).unwrap();

    // A wall across the upper half with a gap in the middle.
    let mut elevation = Grid::filled(shape, RES, -0.2).unwrap();
    for col in (5..CELL_N - 5).filter(|c| !(27..33).contains(c)) {
        elevation.set(20, col, 0.4);
    }

    // A path from the bottom through the gap, ending near the top.
    let path: Vec<GridCoord> = (8..52).rev().map(|row| GridCoord::new(row, 30)).collect();
    let goal = Goal::new(0.0, 1.2);

    for frame in 0..3 {
        let report = pipeline
            .run(&[elevation.clone()], &[layers::ELEVATION], Some(goal), Some(&path))
            .unwrap();
        println!("frame {}: clean={}", report.frame, report.is_clean());
        if frame == 0 {
            summarize(&pipeline);
        }
    }

    // Planner drops its goal and path: those filters degrade, the frame
    // still completes.
    let report = pipeline
        .run(&[elevation], &[layers::ELEVATION], None, None)
        .unwrap();
    println!("\nwithout goal and path:");
    for stage in &report.degraded {
        println!("  {:<22} {}", stage.plugin, stage.reason);
    }
}

fn summarize(pipeline: &Pipeline) {
    println!();
    for name in pipeline.plugin_layer_names() {
        let Some(layer) = pipeline.layer(name) else {
            continue;
        };
        let finite: Vec<f32> = layer.as_slice().iter().copied().filter(|v| v.is_finite()).collect();
        let nan = layer.as_slice().iter().filter(|v| v.is_nan()).count();
        let (min, max) = finite
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        println!(
            "  {:<30} finite={:>5} nan={:>5} min={:>8.3} max={:>8.3}",
            name,
            finite.len(),
            nan,
            min,
            max,
        );
    }
    println!();
}
