//! Criterion benchmarks for the reference filter pipeline.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use scree_bench::{reference_goal, reference_path, reference_profile, reference_terrain, stress_profile};
use scree_core::GridShape;
use scree_plugin::Pipeline;

fn bench_frame(c: &mut Criterion, label: &str, cell_n: usize, mut pipeline: Pipeline) {
    let shape = GridShape::square(cell_n);
    let terrain = [reference_terrain(shape, cell_n * 2, 42).unwrap()];
    let path = reference_path(shape);
    let goal = Some(reference_goal(shape));

    // Warm up: run one frame so every layer is populated
    pipeline.run(&terrain, &["elevation"], goal, Some(&path)).unwrap();

    c.bench_function(label, |b| {
        b.iter(|| {
            let report = pipeline.run(&terrain, &["elevation"], goal, Some(&path)).unwrap();
            black_box(&report);
        });
    });
}

fn bench_frame_10k(c: &mut Criterion) {
    let pipeline = Pipeline::new(reference_profile().unwrap()).unwrap();
    bench_frame(c, "frame_10k", 100, pipeline);
}

fn bench_frame_100k(c: &mut Criterion) {
    let pipeline = Pipeline::new(stress_profile().unwrap()).unwrap();
    bench_frame(c, "frame_100k", 316, pipeline);
}

fn bench_degraded_frame_10k(c: &mut Criterion) {
    let shape = GridShape::square(100);
    let mut pipeline = Pipeline::new(reference_profile().unwrap()).unwrap();
    let terrain = [reference_terrain(shape, 200, 42).unwrap()];

    c.bench_function("degraded_frame_10k", |b| {
        b.iter(|| {
            let report = pipeline.run(&terrain, &["elevation"], None, None).unwrap();
            black_box(&report);
        });
    });
}

criterion_group!(
    benches,
    bench_frame_10k,
    bench_frame_100k,
    bench_degraded_frame_10k
);
criterion_main!(benches);
