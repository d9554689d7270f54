#![no_main]

use std::sync::{Arc, Mutex};

use libfuzzer_sys::fuzz_target;
use tickcache::policy::lru::LruCore;

// Fuzz arbitrary operation sequences on LruCore
//
// Every mutation is checked against the column/window invariants, and the
// eviction callback count is checked against the operations that may fire it.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte picks the capacity (1-32)
    let capacity = (data[0] as usize) % 32 + 1;
    let notified = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&notified);
    let mut cache: LruCore<u8, u32> = LruCore::with_on_evict(capacity, move |_, _| {
        if let Ok(mut n) = sink.lock() {
            *n += 1;
        }
    });
    let mut capacity = capacity;

    let mut idx = 1;
    while idx + 1 < data.len() {
        let op = data[idx] % 10;
        let key = data[idx + 1] % 48;
        let before = cache.len();
        let was_present = cache.contains(&key);
        let notified_before = *notified.lock().unwrap();

        match op {
            0 => {
                let _ = cache.get(&key);
            },
            1 => {
                assert_eq!(cache.set(key, u32::from(key)), !was_present);
            },
            2 => {
                assert_eq!(cache.replace(key, u32::from(key) + 1), was_present);
            },
            3 => {
                assert_eq!(cache.remove(&key), was_present);
            },
            4 => {
                let fail = key % 3 == 0;
                let result = cache.get_or_set(key, |k| if fail { Err(()) } else { Ok(u32::from(*k)) });
                if fail && !was_present {
                    assert!(result.is_err());
                    assert_eq!(cache.len(), before);
                }
            },
            5 => {
                let _ = cache.touch(&key);
            },
            6 => {
                let popped = cache.pop_lru();
                assert_eq!(popped.is_some(), before > 0);
            },
            7 => {
                capacity = usize::from(key % 16) + 1;
                cache.resize(capacity).unwrap();
            },
            8 => {
                if key % 4 == 0 {
                    cache.remove_all();
                    assert_eq!(*notified.lock().unwrap(), notified_before + before);
                } else if key % 4 == 1 {
                    cache.reset();
                    assert_eq!(*notified.lock().unwrap(), notified_before);
                }
            },
            9 => {
                // ordered walks must see every entry exactly once
                assert_eq!(cache.iter_asc().count(), cache.len());
                assert_eq!(cache.iter_desc().count(), cache.len());
            },
            _ => unreachable!(),
        }

        if let Err(err) = cache.check_invariants() {
            panic!("after op {}: {}", op, err);
        }
        assert!(cache.len() <= capacity);
        assert_eq!(cache.capacity(), capacity);

        idx += 2;
    }
});
