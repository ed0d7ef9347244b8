//! Benchmarks for range normalization and rendering.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use good_bots::aggregator::{normalize_all, AggregatedOutput, RangeGroup};
use good_bots::range::normalize;
use good_bots::writer::render;
use std::hint::black_box;

/// Generate CIDRs of varying sizes
fn generate_cidrs(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let a = (i % 256) as u8;
            let b = ((i / 256) % 256) as u8;
            let prefix = 16 + (i % 17) as u8; // Prefix lengths 16-32
            format!("{}.{}.0.0/{}", a, b, prefix)
        })
        .collect()
}

/// Generate explicit ranges and bare addresses
fn generate_mixed(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let a = (i % 256) as u8;
            let b = ((i / 256) % 256) as u8;
            if i % 2 == 0 {
                format!("{}.{}.1.1-{}.{}.1.200", a, b, a, b)
            } else {
                format!("{}.{}.2.2", a, b)
            }
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for size in [100, 1000, 10000] {
        let cidrs = generate_cidrs(size);
        group.bench_with_input(BenchmarkId::new("cidrs", size), &cidrs, |b, specs| {
            b.iter(|| {
                for spec in specs {
                    let _ = black_box(normalize(spec));
                }
            });
        });

        let mixed = generate_mixed(size);
        group.bench_with_input(BenchmarkId::new("mixed", size), &mixed, |b, specs| {
            b.iter(|| black_box(normalize_all("bench", specs)));
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for size in [100, 1000, 10000] {
        let (ranges, _) = normalize_all("bench", &generate_cidrs(size));
        let output = AggregatedOutput::from_groups(vec![RangeGroup {
            name: "Bench Bot".to_string(),
            description: String::new(),
            ranges,
        }]);
        group.bench_with_input(BenchmarkId::new("ranges", size), &output, |b, output| {
            b.iter(|| black_box(render(output, "GOOD_BOTS")));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_render);
criterion_main!(benches);
