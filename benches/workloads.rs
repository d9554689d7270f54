//! Hit-rate and throughput under synthetic access patterns.
//!
//! Run with: `cargo bench --bench workloads`
//!
//! Each workload drives `get_or_set` against a fixed key universe, so the
//! reported throughput includes the producer on every miss.

use std::time::Instant;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tickcache::policy::lru::LruCore;

const CAPACITY: usize = 128;
const UNIVERSE: u64 = 1_024;
const OPS: usize = 20_000;
const SEED: u64 = 42;

#[derive(Debug, Clone, Copy)]
enum Workload {
    Uniform,
    HotSet { hot_fraction: f64, hot_prob: f64 },
    Scan,
    /// Hot set interrupted by a sequential scan every `period` accesses.
    ScanBurst { period: usize, length: usize },
}

fn workloads() -> Vec<(&'static str, Workload)> {
    vec![
        ("uniform", Workload::Uniform),
        (
            "hotset_90_10",
            Workload::HotSet {
                hot_fraction: 0.1,
                hot_prob: 0.9,
            },
        ),
        ("scan", Workload::Scan),
        (
            "scan_burst",
            Workload::ScanBurst {
                period: 2_000,
                length: 256,
            },
        ),
    ]
}

fn generate(workload: Workload, ops: usize, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let hot = |rng: &mut StdRng, fraction: f64, prob: f64| {
        let hot_size = ((UNIVERSE as f64 * fraction) as u64).max(1);
        if rng.gen_bool(prob) {
            rng.gen_range(0..hot_size)
        } else {
            rng.gen_range(hot_size..UNIVERSE)
        }
    };

    (0..ops)
        .map(|i| match workload {
            Workload::Uniform => rng.gen_range(0..UNIVERSE),
            Workload::HotSet {
                hot_fraction,
                hot_prob,
            } => hot(&mut rng, hot_fraction, hot_prob),
            Workload::Scan => i as u64 % UNIVERSE,
            Workload::ScanBurst { period, length } => {
                let phase = i % period;
                if phase < length {
                    UNIVERSE + phase as u64
                } else {
                    hot(&mut rng, 0.1, 0.9)
                }
            },
        })
        .collect()
}

fn run(keys: &[u64]) -> (u64, u64) {
    let mut cache = LruCore::new(CAPACITY);
    let mut misses = 0u64;
    for &key in keys {
        let _ = cache.get_or_set(key, |k| {
            misses += 1;
            Ok::<_, ()>(*k)
        });
    }
    (keys.len() as u64 - misses, misses)
}

fn bench_workloads(c: &mut Criterion) {
    print_hit_rates();

    let mut group = c.benchmark_group("lru_workloads");
    group.throughput(Throughput::Elements(OPS as u64));

    for (name, workload) in workloads() {
        let keys = generate(workload, OPS, SEED);
        group.bench_with_input(BenchmarkId::from_parameter(name), &keys, |b, keys| {
            b.iter(|| std::hint::black_box(run(keys)))
        });
    }
    group.finish();
}

fn print_hit_rates() {
    println!("\n=== LRU hit rates (capacity {}, universe {}) ===", CAPACITY, UNIVERSE);
    for (name, workload) in workloads() {
        let keys = generate(workload, OPS, SEED);
        let start = Instant::now();
        let (hits, misses) = run(&keys);
        let elapsed = start.elapsed();
        println!(
            "{:<14} hit rate {:>6.2}%  ({} hits, {} misses, {:?})",
            name,
            hits as f64 * 100.0 / (hits + misses) as f64,
            hits,
            misses,
            elapsed
        );
    }
}

criterion_group!(benches, bench_workloads);
criterion_main!(benches);
