//! Logical-clock recency window over a flat column of ticks.
//!
//! `RecencyWindow` is the recency half of the LRU engine: one `u64` tick per
//! slot, position-aligned with the engine's key and value columns, plus the
//! clock that issues the next tick.
//!
//! ## The window invariant
//!
//! ```text
//!   slot:    0    1    2    3    4          clock = 12, len = 5
//!   tick:   [9]  [7]  [11] [8]  [10]
//!
//!   live ticks == { clock - len, ..., clock - 1 } == { 7, 8, 9, 10, 11 }
//!                   ▲ oldest (LRU)                            ▲ newest (MRU)
//! ```
//!
//! Because the live ticks are exactly the last `len` ticks issued, the LRU
//! slot is whichever slot holds `clock - len`, and an ordered walk visits
//! `oldest..clock` one tick at a time. No heap, no list.
//!
//! ## Hole closing
//!
//! Stamping a slot with a fresh tick, or removing a slot, vacates its old tick
//! `t`. Every live tick below `t` then moves up by one, which slides the
//! window forward without reordering anything:
//!
//! ```text
//!   touch(slot 3)   tick 8 vacated, fresh tick 12 issued
//!
//!   before:  [9]  [7]  [11] [8]  [10]     clock 12   window 7..=11
//!   stamp:   [9]  [7]  [11] [12] [10]     clock 13
//!   close:   [9]  [8]  [11] [12] [10]     7 < 8 moves up → window 8..=12
//! ```
//!
//! ## Repair and rebase
//!
//! Shared-lock touches ([`RecencyWindow::touch_shared`]) race with each other
//! and can leave duplicates or gaps. [`RecencyWindow::repair`] renumbers the
//! live ticks to `0..len` in their existing order; [`RecencyWindow::settle`]
//! does so only when a shared touch has happened since the last check and the
//! window is actually broken. Before the clock would reach `u64::MAX`,
//! [`RecencyWindow::push`] and [`RecencyWindow::touch`] rebase the window down
//! to `0..len`, falling back to a repair when the window is not contiguous.
//!
//! ## Thread Safety
//!
//! Ticks and the clock are atomics so that `touch_shared` can run under a
//! read lock. Every other mutation takes `&mut self` and uses `get_mut`.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tracing::debug;

use crate::error::InvariantError;

/// What the window had to renumber before issuing a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renumbering {
    /// Ticks were left alone.
    None,
    /// The clock was about to overflow; ticks were shifted down to `0..len`.
    Rebased,
    /// The window was not contiguous; ticks were renumbered by rank.
    Repaired,
}

/// Column of per-slot ticks plus the issuing clock.
#[derive(Debug, Default)]
pub struct RecencyWindow {
    ticks: Vec<AtomicU64>,
    clock: AtomicU64,
    shared_touched: AtomicBool,
}

impl RecencyWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ticks: Vec::with_capacity(capacity),
            clock: AtomicU64::new(0),
            shared_touched: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Next tick to be issued.
    #[inline]
    pub fn clock(&self) -> u64 {
        self.clock.load(Ordering::Acquire)
    }

    /// Lowest tick of the window, `clock - len`.
    #[inline]
    pub fn oldest(&self) -> u64 {
        self.clock().saturating_sub(self.len() as u64)
    }

    /// Highest tick of the window, `clock - 1`, or `None` when empty.
    #[inline]
    pub fn newest(&self) -> Option<u64> {
        if self.is_empty() {
            None
        } else {
            self.clock().checked_sub(1)
        }
    }

    /// Tick currently recorded for `slot`.
    #[inline]
    pub fn tick(&self, slot: usize) -> u64 {
        self.ticks[slot].load(Ordering::Acquire)
    }

    /// Slot holding `tick`, if any.
    pub fn find(&self, tick: u64) -> Option<usize> {
        self.ticks
            .iter()
            .position(|t| t.load(Ordering::Acquire) == tick)
    }

    /// Number of live slots touched more recently than `slot` (0 = MRU).
    pub fn rank(&self, slot: usize) -> usize {
        let tick = self.tick(slot);
        self.ticks
            .iter()
            .filter(|t| t.load(Ordering::Acquire) > tick)
            .count()
    }

    /// Appends a slot stamped with a fresh tick.
    pub fn push(&mut self) -> Renumbering {
        let renumbering = self.ensure_headroom();
        let tick = self.issue();
        self.ticks.push(AtomicU64::new(tick));
        renumbering
    }

    /// Stamps `slot` with a fresh tick and closes the hole it leaves behind.
    pub fn touch(&mut self, slot: usize) -> Renumbering {
        let renumbering = self.ensure_headroom();
        let vacated = *self.ticks[slot].get_mut();
        let fresh = self.issue();
        *self.ticks[slot].get_mut() = fresh;
        self.close_hole(vacated);
        renumbering
    }

    /// Shared-access variant of [`touch`](Self::touch).
    ///
    /// Concurrent callers may interleave, so the window can come out with
    /// gaps or duplicate ticks; the next exclusive eviction repairs it. Returns
    /// `false` without stamping when the clock is saturated, leaving the
    /// rebase to the next exclusive operation.
    pub fn touch_shared(&self, slot: usize) -> bool {
        let vacated = self.ticks[slot].load(Ordering::Acquire);
        let Ok(fresh) = self
            .clock
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| {
                (c < u64::MAX).then_some(c + 1)
            })
        else {
            return false;
        };

        self.shared_touched.store(true, Ordering::Release);
        self.ticks[slot].store(fresh, Ordering::Release);
        for (idx, tick) in self.ticks.iter().enumerate() {
            if idx == slot {
                continue;
            }
            let _ = tick.fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| {
                (t < vacated).then_some(t + 1)
            });
        }
        true
    }

    /// Swap-removes `slot` and closes its hole. Returns the vacated tick.
    pub fn swap_remove(&mut self, slot: usize) -> u64 {
        let vacated = self.ticks.swap_remove(slot).into_inner();
        self.close_hole(vacated);
        vacated
    }

    /// Renumbers live ticks to `0..len` in their current order and sets the
    /// clock to `len`. Ties keep slot order.
    pub fn repair(&mut self) {
        let snapshot: Vec<u64> = self.ticks.iter_mut().map(|t| *t.get_mut()).collect();
        let mut order: Vec<usize> = (0..snapshot.len()).collect();
        order.sort_unstable_by_key(|&slot| (snapshot[slot], slot));

        for (rank, slot) in order.into_iter().enumerate() {
            *self.ticks[slot].get_mut() = rank as u64;
        }
        let len = self.ticks.len() as u64;
        *self.clock.get_mut() = len;

        debug!(len, "repaired recency window");
    }

    /// Repairs the window if shared touches since the last call broke it.
    pub fn settle(&mut self) -> Renumbering {
        if std::mem::take(self.shared_touched.get_mut()) && !self.is_contiguous() {
            self.repair();
            Renumbering::Repaired
        } else {
            Renumbering::None
        }
    }

    /// Shifts a contiguous window down to `0..len`; repairs otherwise.
    pub fn rebase(&mut self) -> Renumbering {
        if !self.is_contiguous() {
            self.repair();
            return Renumbering::Repaired;
        }

        let base = self.oldest();
        for tick in &mut self.ticks {
            *tick.get_mut() -= base;
        }
        let len = self.ticks.len() as u64;
        *self.clock.get_mut() = len;

        debug!(base, len, "rebased recency window");
        Renumbering::Rebased
    }

    /// `true` when the live ticks are exactly `clock - len .. clock`.
    pub fn is_contiguous(&self) -> bool {
        let clock = self.clock();
        let len = self.len();
        if len as u64 > clock {
            return false;
        }

        let oldest = clock - len as u64;
        let mut seen = vec![false; len];
        for tick in &self.ticks {
            let tick = tick.load(Ordering::Acquire);
            if tick < oldest || tick >= clock {
                return false;
            }
            let offset = (tick - oldest) as usize;
            if seen[offset] {
                return false;
            }
            seen[offset] = true;
        }
        true
    }

    /// Re-reserves tick storage for exactly `capacity` slots.
    pub fn resize_storage(&mut self, capacity: usize) {
        if capacity > self.ticks.capacity() {
            self.ticks.reserve_exact(capacity - self.ticks.len());
        } else {
            self.ticks.shrink_to(capacity);
        }
    }

    /// Drops every tick and resets the clock to zero.
    pub fn clear(&mut self) {
        self.ticks.clear();
        *self.clock.get_mut() = 0;
        *self.shared_touched.get_mut() = false;
    }

    /// Validates the window, returning the first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let clock = self.clock();
        for (slot, tick) in self.ticks.iter().enumerate() {
            let tick = tick.load(Ordering::Acquire);
            if tick >= clock {
                return Err(InvariantError::new(format!(
                    "slot {} has tick {} at or beyond clock {}",
                    slot, tick, clock
                )));
            }
        }
        if !self.is_contiguous() {
            return Err(InvariantError::new(format!(
                "ticks of {} slots do not cover window [{}, {})",
                self.len(),
                self.oldest(),
                clock
            )));
        }
        Ok(())
    }

    #[inline]
    fn ensure_headroom(&mut self) -> Renumbering {
        if *self.clock.get_mut() == u64::MAX {
            self.rebase()
        } else {
            Renumbering::None
        }
    }

    #[inline]
    fn issue(&mut self) -> u64 {
        let clock = self.clock.get_mut();
        let tick = *clock;
        *clock += 1;
        tick
    }

    #[inline]
    fn close_hole(&mut self, vacated: u64) {
        for tick in &mut self.ticks {
            let tick = tick.get_mut();
            if *tick < vacated {
                *tick += 1;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(ticks: &[u64], clock: u64) -> Self {
        Self {
            ticks: ticks.iter().map(|&t| AtomicU64::new(t)).collect(),
            clock: AtomicU64::new(clock),
            shared_touched: AtomicBool::new(false),
        }
    }

    #[cfg(test)]
    pub(crate) fn ticks(&self) -> Vec<u64> {
        self.ticks
            .iter()
            .map(|t| t.load(Ordering::Acquire))
            .collect()
    }
}
