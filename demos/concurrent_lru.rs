use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tickcache::policy::lru::ConcurrentLruCache;

/// Stands in for a slow backend lookup.
fn load_user(id: &u64) -> Result<String, String> {
    thread::sleep(Duration::from_millis(5));
    if *id == 13 {
        Err(format!("user {} not found", id))
    } else {
        Ok(format!("user-{}", id))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cache: ConcurrentLruCache<u64, String> = ConcurrentLruCache::new(16);
    let loads = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let cache = cache.clone();
            let loads = Arc::clone(&loads);
            thread::spawn(move || {
                for id in 10..20u64 {
                    let result = cache.get_or_set(id, |id| {
                        loads.fetch_add(1, Ordering::Relaxed);
                        load_user(id)
                    });
                    if let Err(err) = result {
                        println!("worker {}: {}", worker, err);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            eprintln!("worker panicked");
        }
    }

    // 9 ids load once each; id 13 fails and is retried by every worker
    println!("loads = {}", loads.load(Ordering::Relaxed));
    println!("cached = {}", cache.len());
    let newest: Vec<u64> = cache.iter_desc().take(3).map(|(id, _)| id).collect();
    println!("most recent ids: {:?}", newest);
}
