use std::sync::{Arc, Mutex};

use tickcache::builder::LruBuilder;

fn main() {
    // RUST_LOG=tickcache=trace shows each eviction
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let evicted = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&evicted);
    let mut cache = LruBuilder::new(8)
        .on_evict(move |key: u32, value: String| {
            println!("evicted {} => {}", key, value);
            if let Ok(mut log) = sink.lock() {
                log.push(key);
            }
        })
        .build();

    for key in 1..=10 {
        cache.replace(key, format!("value-{}", key));
    }

    println!("len = {}", cache.len());
    for (key, value) in cache.iter_asc() {
        println!("{} => {}", key, value);
    }

    if let Some(value) = cache.get(&3) {
        println!("hit 3: {}", value);
    }
    let oldest = cache.peek_lru().map(|(k, _)| *k);
    println!("oldest after get(3): {:?}", oldest);
}

// Expected output:
// evicted 1 => value-1
// evicted 2 => value-2
// len = 8
// 3 => value-3
// 4 => value-4
// ...
// 10 => value-10
// hit 3: value-3
// oldest after get(3): Some(4)
//
// Explanation: capacity=8; inserting keys 9 and 10 evicts the two least
// recently used keys, 1 and 2. Reading 3 makes it most recently used, so 4
// becomes the next eviction candidate.
