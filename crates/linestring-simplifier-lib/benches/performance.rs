//! Performance benchmarks for linestring-simplifier-lib
//!
//! Run with: cargo bench --package linestring-simplifier-lib

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use linestring_simplifier_lib::{Geometry, SimplificationEngine, SimplifyOptions};

/// Generate a realistic wandering track with the specified number of points.
fn generate_track(num_points: usize, base_lat: f64, base_lon: f64) -> Geometry {
    let coords: Vec<[f64; 2]> = (0..num_points)
        .map(|i| {
            let t = i as f64 / num_points as f64;
            let lat = base_lat + t * 0.1 + (t * 50.0).sin() * 0.001;
            let lon = base_lon + t * 0.1 + (t * 30.0).cos() * 0.001;
            [lon, lat]
        })
        .collect();
    Geometry::line_string(&coords)
}

/// Generate a city-block style track with a right-angle turn every `block` points
fn generate_grid_track(num_points: usize, block: usize) -> Geometry {
    let mut coords = Vec::with_capacity(num_points);
    let (mut lon, mut lat) = (-122.45, 37.75);
    for i in 0..num_points {
        coords.push([lon, lat]);
        if (i / block) % 2 == 0 {
            lat += 0.0005;
        } else {
            lon += 0.0005;
        }
    }
    Geometry::line_string(&coords)
}

// ============================================================================
// Core Benchmarks - Key performance indicators
// ============================================================================

fn bench_simplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("simplify");
    let engine = SimplificationEngine::default();

    for num_points in [1_000, 10_000, 50_000] {
        let track = generate_track(num_points, 51.5, -0.1);
        group.throughput(Throughput::Elements(num_points as u64));
        group.bench_with_input(
            BenchmarkId::new("wiggly", num_points),
            &track,
            |b, track| {
                b.iter(|| engine.simplify(track, 500).unwrap());
            },
        );
    }

    // Many corners forces pruning
    let grid = generate_grid_track(10_000, 20);
    group.bench_function("grid_10k_pruned", |b| {
        b.iter(|| engine.simplify(&grid, 100).unwrap());
    });

    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    let engine = SimplificationEngine::default();

    let track = generate_track(50_000, 51.5, -0.1);
    group.throughput(Throughput::Elements(50_000));
    group.bench_function("wiggly_50k", |b| {
        b.iter(|| engine.analyze(&track));
    });

    group.finish();
}

fn bench_preview(c: &mut Criterion) {
    let mut group = c.benchmark_group("preview");
    group.sample_size(20);

    let track = generate_track(10_000, 51.5, -0.1);
    let budgets = [10, 50, 100, 500, 1_000, 5_000];

    let engine = SimplificationEngine::default();
    group.bench_function("parallel_6_budgets_10k", |b| {
        b.iter(|| engine.preview(&track, &budgets).unwrap());
    });

    // Corner preservation disabled reduces the pipeline to the budgeted fill
    let fill_only = SimplificationEngine::new(SimplifyOptions {
        preserve_corners: false,
        preserve_curves: false,
        ..SimplifyOptions::default()
    });
    group.bench_function("fill_only_6_budgets_10k", |b| {
        b.iter(|| fill_only.preview(&track, &budgets).unwrap());
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(benches, bench_simplify, bench_analyze, bench_preview);

criterion_main!(benches);
