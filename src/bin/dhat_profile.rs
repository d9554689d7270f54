//! DHAT heap profiler for tickcache.
//!
//! Run with: cargo run --bin dhat_profile --release --features dhat-heap
//! View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use tickcache::policy::lru::{ConcurrentLruCache, LruCore};
use tickcache::traits::RecencyCache;

/// Simple XorShift64 RNG for deterministic workloads.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

/// 90% of accesses hit 10% of keys; misses go through `get_or_set`.
fn hotset_workload<C: RecencyCache<u64, Vec<u8>>>(
    cache: &mut C,
    operations: usize,
    universe: u64,
    seed: u64,
) {
    let mut rng = XorShift64::new(seed);
    let hot_size = (universe / 10).max(1);

    for _ in 0..operations {
        let key = if rng.next_u64() % 10 < 9 {
            rng.next_u64() % hot_size
        } else {
            hot_size + rng.next_u64() % (universe - hot_size)
        };
        let _ = cache.get_or_set(key, |k| Ok::<_, ()>(k.to_le_bytes().to_vec()));
    }
}

/// Overwrites a rolling window of keys, exercising the displaced-value path.
fn replace_churn<C: RecencyCache<u64, Vec<u8>>>(cache: &mut C, operations: usize, universe: u64) {
    for i in 0..operations {
        let key = (i as u64) % universe;
        cache.replace(key, vec![0u8; 32]);
    }
}

fn profile_core() {
    println!("=== Profiling LruCore ===");
    let capacity = 256;
    let operations = 50_000;
    let universe = 1_024;

    let mut cache = LruCore::with_on_evict(capacity, |_k: u64, v: Vec<u8>| drop(v));

    hotset_workload(&mut cache, operations, universe, 42);
    replace_churn(&mut cache, operations / 2, universe);

    // Shrink then regrow to exercise column re-reservation
    let _ = cache.resize(capacity / 4);
    let _ = cache.resize(capacity);
    hotset_workload(&mut cache, operations / 4, universe, 7);

    println!("  Final size: {}", cache.len());
}

fn profile_concurrent() {
    println!("=== Profiling ConcurrentLruCache ===");
    let capacity = 256;
    let operations = 50_000u64;

    let cache: ConcurrentLruCache<u64, Vec<u8>> = ConcurrentLruCache::new(capacity);
    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let cache = cache.clone();
            std::thread::spawn(move || {
                let mut rng = XorShift64::new(t + 1);
                for _ in 0..operations / 4 {
                    let key = rng.next_u64() % 512;
                    if cache.get_with(&key, |v| v.len()).is_none() {
                        cache.set(key, vec![0u8; 16]);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        let _ = handle.join();
    }

    println!("  Final size: {}", cache.len());
}

fn main() {
    let _profiler = dhat::Profiler::new_heap();

    println!("tickcache DHAT Heap Profiling");
    println!("=============================\n");

    profile_core();
    profile_concurrent();

    println!("\n=============================");
}
