//! Benchmarks for the price reducer
//!
//! Target: a 120-point window reduced in well under a microsecond.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tickwatch::hot_path::reducer;

fn bench_min_max(c: &mut Criterion) {
    // Window-sized slice with extremes away from the edges
    let prices: Vec<f64> = (0..120)
        .map(|i| 100.0 + ((i * 31) % 17) as f64 * 0.25)
        .collect();

    c.bench_function("reducer_min_max_120", |b| {
        b.iter(|| reducer::min_max(black_box(&prices)))
    });
}

fn bench_batch_change_percent(c: &mut Criterion) {
    let current: Vec<f64> = (0..1_000).map(|i| 100.0 + (i % 13) as f64).collect();
    let base: Vec<f64> = (0..1_000).map(|i| 90.0 + (i % 7) as f64).collect();

    c.bench_function("reducer_batch_change_1000", |b| {
        b.iter(|| reducer::batch_change_percent(black_box(&current), black_box(&base)))
    });
}

criterion_group!(benches, bench_min_max, bench_batch_change_percent);
criterion_main!(benches);
