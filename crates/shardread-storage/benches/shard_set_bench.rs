//! Shard-set evaluation benchmark
//!
//! Measures the per-attempt cost that does not touch storage:
//! - Shard-name parsing
//! - Completeness evaluation for large listings

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shardread_storage::{evaluate, parse_shard_name, MemoryFileSystem, ResourceId, ResourceMatcher};
use std::sync::Arc;

fn listing(total: usize, with_noise: bool) -> Vec<ResourceId> {
    let width = total.to_string().len().max(5);
    let mut ids: Vec<ResourceId> = (0..total)
        .map(|i| {
            ResourceId::new(format!(
                "gs://bucket/job/output/result-{:0w$}-of-{:0w$}",
                i,
                total,
                w = width
            ))
        })
        .collect();
    if with_noise {
        ids.push(ResourceId::new("gs://bucket/job/output/_SUCCESS"));
        ids.push(ResourceId::new("gs://bucket/job/output/.temp-beam-1234"));
    }
    ids
}

fn bench_parse_shard_name(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_shard_name");
    for name in ["result-00042-of-00100", "result", "result-0a-of-00100"] {
        group.bench_with_input(BenchmarkId::from_parameter(name), name, |b, name| {
            b.iter(|| parse_shard_name(black_box(name)))
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    for total in [10usize, 1_000, 10_000] {
        let complete = listing(total, true);
        group.bench_with_input(BenchmarkId::new("complete", total), &complete, |b, ids| {
            b.iter(|| evaluate(black_box(ids)))
        });

        let mut partial = listing(total, false);
        partial.pop();
        group.bench_with_input(BenchmarkId::new("missing_one", total), &partial, |b, ids| {
            b.iter(|| evaluate(black_box(ids)))
        });
    }
    group.finish();
}

fn bench_memory_listing(c: &mut Criterion) {
    let fs = Arc::new(MemoryFileSystem::new());
    for id in listing(1_000, true) {
        fs.insert(id.as_str(), "line");
    }
    let matcher = ResourceMatcher::new(fs);

    c.bench_function("memory_match_1000", |b| {
        b.iter(|| matcher.match_pattern(black_box("gs://bucket/job/output/result-*")))
    });
}

criterion_group!(benches, bench_parse_shard_name, bench_evaluate, bench_memory_listing);
criterion_main!(benches);
