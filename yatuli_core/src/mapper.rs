//! Position mapping: centered reading + anchor -> bounded application value.
//!
//! Three regimes, checked in order on every update:
//!
//! 1. **Edge jump**: the reading is beyond `edge.high`/`edge.low` and there is
//!    room for a full `edge_step`. Value and anchor advance together, at most
//!    once per `edge.pace_ms`; the jump rounds outward onto the step grid.
//! 2. **Tracking**: otherwise a movement is accepted if it continues the last
//!    accepted direction or reverses by more than `dead_band` counts. The value
//!    becomes `base + map(sample)` snapped to the step grid anchored at `start`.
//! 3. **Range rejection**: a tracked value outside `[start, end]` is dropped and
//!    the previous value kept.
//!
//! Invariant: `start <= value <= end` after every operation.

use crate::config::{EdgeCfg, HysteresisCfg, MIN_STEP, RangeCfg};
use crate::error::TunerError;
use crate::fixed_point::{abs_diff_i32_u32, map_sample, snap_to_grid, step_onto_grid};
use crate::pacing::Pacer;

/// Direction of the last accepted movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Up,
    Down,
}

#[derive(Debug, Clone)]
pub struct PositionMapper {
    range: RangeCfg,
    hysteresis: HysteresisCfg,
    edge: EdgeCfg,

    base: i64,
    value: i64,
    last_sample: i32,
    last_motion: Option<Motion>,
    edge_pacer: Pacer,
}

impl PositionMapper {
    /// New mapper anchored so that `sample` maps to `range.start`.
    ///
    /// `range.step` below [`MIN_STEP`] is raised to it.
    pub fn new(range: RangeCfg, hysteresis: HysteresisCfg, edge: EdgeCfg, sample: i32) -> Self {
        let range = RangeCfg {
            step: range.step.max(MIN_STEP),
            ..range
        };
        let mut m = Self {
            range,
            hysteresis,
            edge,
            base: range.start,
            value: range.start,
            last_sample: sample,
            last_motion: None,
            edge_pacer: Pacer::new(edge.pace_ms),
        };
        m.anchor(range.start, sample);
        m
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn base(&self) -> i64 {
        self.base
    }

    pub fn range(&self) -> &RangeCfg {
        &self.range
    }

    /// Effective step after flooring.
    pub fn step(&self) -> u32 {
        self.range.step
    }

    pub fn last_motion(&self) -> Option<Motion> {
        self.last_motion
    }

    /// Value offset contributed by a reading.
    #[inline]
    pub fn map(&self, sample: i32) -> i64 {
        map_sample(sample, self.hysteresis.counts_per_step, self.range.step)
    }

    /// Re-anchor so that `sample` maps exactly to `target`, rejecting targets
    /// outside the range without touching any state.
    pub fn set(&mut self, target: i64, sample: i32) -> Result<(), TunerError> {
        if !self.range.contains(target) {
            return Err(TunerError::OutOfRange {
                target,
                start: self.range.start,
                end: self.range.end,
            });
        }
        self.anchor(target, sample);
        Ok(())
    }

    /// Clamp `target` into the range, then re-anchor. Returns the applied value.
    pub fn set_clamped(&mut self, target: i64, sample: i32) -> i64 {
        let v = target.clamp(self.range.start, self.range.end);
        self.anchor(v, sample);
        v
    }

    fn anchor(&mut self, target: i64, sample: i32) {
        self.base = target.saturating_sub(self.map(sample));
        self.value = target;
        self.last_sample = sample;
        self.last_motion = None;
    }

    /// Feed one reading taken at tick `now`. Returns true when the value changed.
    pub fn update(&mut self, sample: i32, now: u32) -> bool {
        if let Some((motion, next)) = self.pinned(sample) {
            return self.edge_jump(motion, next, now);
        }
        self.track(sample)
    }

    /// Pinned against an end stop with room left for a whole edge step.
    /// Returns the direction and the grid-aligned value to jump to.
    fn pinned(&self, sample: i32) -> Option<(Motion, i64)> {
        let edge_step = i64::from(self.range.edge_step);
        if edge_step == 0 {
            return None;
        }
        let (motion, delta) = if sample > self.edge.high {
            (Motion::Up, edge_step)
        } else if sample < self.edge.low {
            (Motion::Down, -edge_step)
        } else {
            return None;
        };
        let next = step_onto_grid(self.value, delta, self.range.start, self.range.step)?;
        self.range.contains(next).then_some((motion, next))
    }

    fn edge_jump(&mut self, motion: Motion, next: i64, now: u32) -> bool {
        if !self.edge_pacer.ready(now) {
            return false;
        }
        // both ends lie in the range, so the difference only overflows for
        // ranges wider than i64; saturate the anchor in that case
        self.base = self.base.saturating_add(next.saturating_sub(self.value));
        self.value = next;
        self.edge_pacer.arm(now);
        tracing::debug!(value = self.value, ?motion, "edge jump");
        true
    }

    fn track(&mut self, sample: i32) -> bool {
        let moved = abs_diff_i32_u32(sample, self.last_sample);
        let motion = match sample.cmp(&self.last_sample) {
            std::cmp::Ordering::Greater => Motion::Up,
            std::cmp::Ordering::Less => Motion::Down,
            std::cmp::Ordering::Equal => return false,
        };
        let continues = self.last_motion == Some(motion);
        if !continues && moved <= self.hysteresis.dead_band {
            return false;
        }

        self.last_motion = Some(motion);
        self.last_sample = sample;

        let Some(raw) = self.base.checked_add(self.map(sample)) else {
            tracing::trace!(kept = self.value, "tracked value overflows i64");
            return false;
        };
        let snapped = snap_to_grid(raw, self.range.start, self.range.step);
        if !self.range.contains(snapped) {
            tracing::trace!(rejected = snapped, kept = self.value, "tracked value out of range");
            return false;
        }
        let changed = snapped != self.value;
        self.value = snapped;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(start: i64, end: i64, step: u32, edge_step: u32) -> PositionMapper {
        PositionMapper::new(
            RangeCfg::new(start, end, step, edge_step),
            HysteresisCfg::default(),
            EdgeCfg::default(),
            0,
        )
    }

    #[test]
    fn step_is_floored() {
        let m = mapper(0, 1000, 3, 0);
        assert_eq!(m.step(), MIN_STEP);
    }

    #[test]
    fn new_anchors_at_start_for_any_reading() {
        let m = PositionMapper::new(
            RangeCfg::new(100, 10_000, 10, 0),
            HysteresisCfg::default(),
            EdgeCfg::default(),
            1234,
        );
        assert_eq!(m.value(), 100);
        assert_eq!(m.base() + m.map(1234), 100);
    }

    #[test]
    fn tracking_follows_reading() {
        let mut m = mapper(0, 100_000, 10, 0);
        assert!(m.update(200, 0));
        assert_eq!(m.value(), 200);
        assert!(m.update(350, 0));
        assert_eq!(m.value(), 350);
    }

    #[test]
    fn small_reversal_is_ignored_large_one_accepted() {
        let mut m = mapper(0, 100_000, 10, 0);
        m.update(200, 0);
        assert_eq!(m.last_motion(), Some(Motion::Up));
        // back by the dead band: flutter
        assert!(!m.update(195, 0));
        assert_eq!(m.value(), 200);
        // back by more: genuine reversal
        assert!(m.update(180, 0));
        assert_eq!(m.value(), 180);
        assert_eq!(m.last_motion(), Some(Motion::Down));
    }

    #[test]
    fn first_movement_needs_to_clear_dead_band() {
        let mut m = mapper(0, 100_000, 10, 0);
        assert!(!m.update(4, 0));
        assert!(!m.update(-5, 0));
        assert_eq!(m.value(), 0);
    }

    #[test]
    fn out_of_range_result_is_rejected() {
        let mut m = mapper(1000, 2000, 10, 0);
        // below start
        assert!(!m.update(-300, 0));
        assert_eq!(m.value(), 1000);
        m.update(500, 0);
        assert_eq!(m.value(), 1500);
        // above end
        assert!(!m.update(2000, 0));
        assert_eq!(m.value(), 1500);
    }

    #[test]
    fn set_rejects_out_of_range_without_mutation() {
        let mut m = mapper(0, 1000, 10, 0);
        m.update(300, 0);
        let before = (m.value(), m.base());
        let err = m.set(1001, 50).expect_err("out of range");
        assert_eq!(
            err,
            TunerError::OutOfRange {
                target: 1001,
                start: 0,
                end: 1000
            }
        );
        assert_eq!((m.value(), m.base()), before);
    }

    #[test]
    fn set_reanchors_base() {
        let mut m = mapper(0, 10_000, 10, 0);
        m.set(5000, 250).unwrap();
        assert_eq!(m.value(), 5000);
        assert_eq!(m.base() + m.map(250), 5000);
        // same reading: nothing to track
        assert!(!m.update(250, 0));
        assert_eq!(m.value(), 5000);
    }

    #[test]
    fn set_clamped_pins_to_nearest_bound() {
        let mut m = mapper(0, 10_000, 10, 0);
        assert_eq!(m.set_clamped(20_000, 0), 10_000);
        assert_eq!(m.value(), 10_000);
        assert_eq!(m.set_clamped(-5, 0), 0);
    }

    #[test]
    fn edge_jump_is_paced() {
        let mut m = mapper(0, 1_000_000, 10, 1000);
        assert!(m.update(5100, 0));
        let after_first = m.value();
        assert!(!m.update(5100, 10));
        assert!(!m.update(5100, 499));
        assert_eq!(m.value(), after_first);
        assert!(m.update(5100, 500));
        assert_eq!(m.value(), after_first + 1000);
    }

    #[test]
    fn edge_jump_moves_base_with_value() {
        let mut m = mapper(0, 1_000_000, 10, 1000);
        m.update(4000, 0);
        let offset = m.value() - m.base();
        m.update(5100, 0);
        assert_eq!(m.value() - m.base(), offset);
    }

    #[test]
    fn pinned_low_jumps_down() {
        let mut m = mapper(0, 1_000_000, 10, 1000);
        m.set(500_000, 0).unwrap();
        assert!(m.update(-5100, 0));
        assert_eq!(m.value(), 499_000);
    }

    #[test]
    fn no_edge_jump_without_room() {
        let mut m = mapper(0, 1000, 10, 1000);
        // value 0, pinned low: no room, falls back to tracking which rejects
        assert!(!m.update(-5100, 0));
        assert_eq!(m.value(), 0);
    }

    #[test]
    fn zero_edge_step_disables_jumps() {
        let mut m = mapper(0, 1_000_000, 10, 0);
        m.update(5100, 0);
        let v = m.value();
        assert_eq!(v, 5100);
        assert!(!m.update(5100, 1000));
        assert_eq!(m.value(), v);
    }

    #[test]
    fn edge_jump_at_i64_max_stops_instead_of_overflowing() {
        let start = i64::MAX - 1500;
        let mut m = mapper(start, i64::MAX, 10, 1000);
        assert!(m.update(5100, 0));
        assert_eq!(m.value(), start + 1000);
        for i in 1..5 {
            assert!(!m.update(5100, i * 600));
            assert_eq!(m.value(), start + 1000);
        }
    }

    #[test]
    fn edge_jump_at_i64_min_stops_instead_of_overflowing() {
        let mut m = mapper(i64::MIN, i64::MIN + 1500, 10, 1000);
        m.set(i64::MIN + 1500, 0).unwrap();
        assert!(m.update(-5100, 0));
        assert_eq!(m.value(), i64::MIN + 500);
        for i in 1..5 {
            assert!(!m.update(-5100, i * 600));
            assert_eq!(m.value(), i64::MIN + 500);
        }
    }

    #[test]
    fn edge_jump_lands_on_the_grid() {
        let mut m = mapper(0, 1_000_000, 10, 1005);
        assert!(m.update(5100, 0));
        assert_eq!(m.value(), 1010);
        assert!(m.update(5100, 500));
        assert_eq!(m.value(), 2020);
        assert_eq!(m.value() % 10, 0);
    }

    #[test]
    fn reanchoring_resets_hysteresis_direction() {
        let mut m = mapper(0, 100_000, 10, 0);
        m.update(200, 0);
        assert_eq!(m.last_motion(), Some(Motion::Up));
        m.set(5000, 200).unwrap();
        assert_eq!(m.last_motion(), None);
        // same direction as before the set, but inside the dead band
        assert!(!m.update(203, 0));
        assert_eq!(m.last_motion(), None);
        assert_eq!(m.value(), 5000);
    }
}
