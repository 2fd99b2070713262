//! Rate limiting against the wrap-tolerant millisecond tick.

use yatuli_traits::clock::deadline_reached;

/// Allows one event per `interval_ms`.
///
/// The first event is allowed immediately; afterwards the next one becomes
/// ready once the tick reaches `last event + interval_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    interval_ms: u32,
    deadline: Option<u32>,
}

impl Pacer {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            deadline: None,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// True when an event may fire at `now`. Does not arm the pacer.
    #[inline]
    pub fn ready(&self, now: u32) -> bool {
        self.deadline.is_none_or(|d| deadline_reached(now, d))
    }

    /// Record an event at `now`.
    #[inline]
    pub fn arm(&mut self, now: u32) {
        self.deadline = Some(now.wrapping_add(self.interval_ms));
    }

    pub fn deadline(&self) -> Option<u32> {
        self.deadline
    }
}
