//! Criterion benchmarks for timeseries aggregation and differentiation.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use granbed_bench::{reference_dump, REFERENCE_TIMESTEPS};
use granbed_dump::TrajectoryIndex;
use granbed_series::{differentiate, AggregateConfig, Aggregator};

/// Benchmark: Sequential aggregation of the reference dump.
fn bench_aggregate_sequential(c: &mut Criterion) {
    let index = Arc::new(TrajectoryIndex::from_text(&reference_dump(42)).unwrap());

    c.bench_function("aggregate_sequential", |b| {
        b.iter(|| {
            let agg = Aggregator::new(Arc::clone(&index), AggregateConfig::sequential())
                .unwrap()
                .run()
                .unwrap();
            black_box(agg.series.len());
        });
    });
}

/// Benchmark: Concurrent aggregation across worker counts.
fn bench_aggregate_concurrent(c: &mut Criterion) {
    let index = Arc::new(TrajectoryIndex::from_text(&reference_dump(42)).unwrap());
    let mut group = c.benchmark_group("aggregate_concurrent");

    for workers in [1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &w| {
            b.iter(|| {
                let agg = Aggregator::new(Arc::clone(&index), AggregateConfig::concurrent(Some(w)))
                    .unwrap()
                    .run()
                    .unwrap();
                black_box(agg.series.len());
            });
        });
    }
    group.finish();
}

/// Benchmark: Differentiate an aggregated series in place.
fn bench_differentiate(c: &mut Criterion) {
    let index = Arc::new(TrajectoryIndex::from_text(&reference_dump(42)).unwrap());
    let base = Aggregator::new(index, AggregateConfig::sequential())
        .unwrap()
        .run()
        .unwrap()
        .series;

    c.bench_function("differentiate_reference", |b| {
        b.iter_batched(
            || base.clone(),
            |mut series| {
                differentiate(&mut series, REFERENCE_TIMESTEPS).unwrap();
                black_box(series);
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_aggregate_sequential,
    bench_aggregate_concurrent,
    bench_differentiate
);
criterion_main!(benches);
