//! Coarse rotation ticks for step-wise navigation.
//!
//! Keeps its own last-reading bookkeeping, so menu code polling `direction()`
//! never disturbs the mapper's hysteresis state and vice versa.

use crate::config::DirectionCfg;
use crate::fixed_point::abs_diff_i32_u32;
use crate::pacing::Pacer;

/// One coarse step of the dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Counter-clockwise.
    Ccw,
    /// No significant motion.
    #[default]
    Idle,
    /// Clockwise.
    Cw,
}

impl Direction {
    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }
}

impl From<Direction> for i8 {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Ccw => -1,
            Direction::Idle => 0,
            Direction::Cw => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectionEmitter {
    ticks: u32,
    pacer: Option<Pacer>,
    last_sample: i32,
}

impl DirectionEmitter {
    pub fn new(cfg: &DirectionCfg, sample: i32) -> Self {
        Self {
            ticks: cfg.ticks.max(1),
            pacer: cfg.paced.then(|| Pacer::new(cfg.pace_ms)),
            last_sample: sample,
        }
    }

    pub fn last_sample(&self) -> i32 {
        self.last_sample
    }

    /// Forget accumulated travel and start counting from `sample`.
    pub fn resync(&mut self, sample: i32) {
        self.last_sample = sample;
    }

    /// Tick for the travel since the last emitted tick, or `Idle`.
    pub fn emit(&mut self, sample: i32, now: u32) -> Direction {
        if let Some(p) = &self.pacer
            && !p.ready(now)
        {
            return Direction::Idle;
        }
        if abs_diff_i32_u32(sample, self.last_sample) < self.ticks {
            return Direction::Idle;
        }
        let dir = if sample > self.last_sample {
            Direction::Cw
        } else {
            Direction::Ccw
        };
        self.last_sample = sample;
        if let Some(p) = &mut self.pacer {
            p.arm(now);
        }
        tracing::trace!(?dir, sample, "direction tick");
        dir
    }
}
