#![no_main]

use libfuzzer_sys::fuzz_target;
use tickcache::ds::RecencyWindow;

// Fuzz push/touch/remove/repair sequences on RecencyWindow
//
// Exclusive operations must keep the window contiguous; shared touches may
// break it, after which settle() has to restore it.
fuzz_target!(|data: &[u8]| {
    let mut window = RecencyWindow::new();
    let mut shared = false;

    for chunk in data.chunks(2) {
        let op = chunk[0] % 6;
        let arg = chunk.get(1).copied().unwrap_or(0) as usize;

        match op {
            0 => {
                if window.len() < 64 {
                    window.push();
                }
            },
            1 if !window.is_empty() => {
                window.touch(arg % window.len());
            },
            2 if !window.is_empty() => {
                window.swap_remove(arg % window.len());
            },
            3 if !window.is_empty() => {
                window.touch_shared(arg % window.len());
                shared = true;
            },
            4 => {
                window.settle();
                shared = false;
            },
            5 => {
                window.repair();
                shared = false;
            },
            _ => {},
        }

        if !shared {
            if let Err(err) = window.check_invariants() {
                panic!("window broken after op {}: {}", op, err);
            }
        }
    }
});
