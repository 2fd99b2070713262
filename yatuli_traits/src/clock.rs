use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

/// Free-running millisecond counter used for pacing.
///
/// - millis(): wraps around at `u32::MAX`, like a microcontroller tick counter
/// - deadline_reached(): wrap-tolerant `now >= deadline`
pub trait Clock {
    fn millis(&self) -> u32;

    /// True once `deadline` is at or behind the current tick, tolerating a
    /// single wrap of the counter between the two.
    fn deadline_reached(&self, deadline: u32) -> bool {
        deadline_reached(self.millis(), deadline)
    }
}

/// Wrap-tolerant comparison of two tick values.
#[inline]
pub fn deadline_reached(now: u32, deadline: u32) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}

/// Real-time clock backed by std::time::Instant, counting from construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn millis(&self) -> u32 {
        // Truncation is the wrap.
        self.epoch.elapsed().as_millis() as u32
    }
}

/// Deterministic clock whose time only moves when told to.
///
/// Clones share the same counter, so a test can keep one handle and hand the
/// other to a tuner.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU32>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the counter at an arbitrary tick (useful to exercise wraparound).
    pub fn starting_at(ms: u32) -> Self {
        Self {
            now: Arc::new(AtomicU32::new(ms)),
        }
    }

    /// Advance the clock by `ms`, wrapping like the hardware counter.
    pub fn advance(&self, ms: u32) {
        let cur = self.now.load(Ordering::Relaxed);
        self.now.store(cur.wrapping_add(ms), Ordering::Relaxed);
    }

    pub fn set(&self, ms: u32) {
        self.now.store(ms, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn millis(&self) -> u32 {
        self.now.load(Ordering::Relaxed)
    }
}
