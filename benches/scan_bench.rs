//! Prefix-sum benchmarks: sequential reference vs the scan tree

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use parascan::{ScanConfig, ScanEngine};

fn sequential_scan(input: &[u64]) -> Vec<u64> {
    input
        .iter()
        .scan(0u64, |acc, &x| {
            *acc += x;
            Some(*acc)
        })
        .collect()
}

fn scan_with(input: &[u64], config: ScanConfig) -> Vec<u64> {
    let engine = ScanEngine::with_config(input, config).expect("build succeeds");
    let mut output = vec![0u64; input.len()];
    engine.compute(&mut output).expect("compute succeeds");
    output
}

fn benchmark_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("prefix_sum");

    for exp in [16u32, 20, 24] {
        let len = 1usize << exp;
        let input: Vec<u64> = (0..len as u64).map(|i| i % 16 + 1).collect();
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("sequential", len), &input, |b, input| {
            b.iter(|| sequential_scan(black_box(input)));
        });

        group.bench_with_input(BenchmarkId::new("tree_depth_0", len), &input, |b, input| {
            b.iter(|| scan_with(black_box(input), ScanConfig::sequential()));
        });

        group.bench_with_input(BenchmarkId::new("tree_depth_4", len), &input, |b, input| {
            b.iter(|| scan_with(black_box(input), ScanConfig::default()));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_scan);
criterion_main!(benches);
