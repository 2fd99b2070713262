//! The polling engine (`TunerCore`).
//!
//! Owns the analog input, the clock and the three stages: oversampler,
//! position mapper and direction emitter. Every operation runs to completion
//! on the caller's thread; nothing blocks or sleeps.

use std::sync::Arc;

use eyre::WrapErr;
use yatuli_traits::{AnalogInput, Clock};

use crate::builder::validate;
use crate::config::{RangeCfg, TunerCfg};
use crate::direction::{Direction, DirectionEmitter};
use crate::error::{Result, TunerError};
use crate::hw_error::map_hw_error;
use crate::mapper::PositionMapper;
use crate::sampler::Oversampler;

/// Unified core for both dynamic (boxed) and generic (static dispatch) variants.
pub struct TunerCore<A: AnalogInput> {
    pub(crate) input: A,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) cfg: TunerCfg,
    pub(crate) sampler: Oversampler,
    pub(crate) mapper: PositionMapper,
    pub(crate) direction: DirectionEmitter,
    pub(crate) sample: i32,
    pub(crate) locked: bool,
}

impl<A: AnalogInput> core::fmt::Debug for TunerCore<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TunerCore")
            .field("pin", &self.cfg.pin)
            .field("value", &self.mapper.value())
            .field("base", &self.mapper.base())
            .field("sample", &self.sample)
            .field("locked", &self.locked)
            .finish()
    }
}

impl<A: AnalogInput> TunerCore<A> {
    /// Configure the pin, take the first reading and anchor the value at
    /// `range.start`. Configuration must already be validated.
    pub(crate) fn init(
        mut input: A,
        clock: Arc<dyn Clock + Send + Sync>,
        cfg: TunerCfg,
    ) -> Result<Self> {
        input
            .configure_input(cfg.pin)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("configuring analog input")?;
        let sampler = Oversampler::new(cfg.pin, cfg.sampler);
        let sample = sampler
            .acquire(&mut input)
            .wrap_err("taking initial sample")?;
        let mapper = PositionMapper::new(cfg.range, cfg.hysteresis, cfg.edge, sample);
        let direction = DirectionEmitter::new(&cfg.direction, sample);
        tracing::debug!(
            pin = cfg.pin,
            start = cfg.range.start,
            end = cfg.range.end,
            step = mapper.step(),
            edge_step = cfg.range.edge_step,
            sample,
            "tuner initialized"
        );
        Ok(Self {
            input,
            clock,
            cfg,
            sampler,
            mapper,
            direction,
            sample,
            locked: false,
        })
    }

    /// Current bounded value.
    pub fn value(&self) -> i64 {
        self.mapper.value()
    }

    /// Last centered reading.
    pub fn sample(&self) -> i32 {
        self.sample
    }

    /// Configured range, with the step already floored.
    pub fn range(&self) -> &RangeCfg {
        self.mapper.range()
    }

    pub fn step(&self) -> u32 {
        self.mapper.step()
    }

    pub fn cfg(&self) -> &TunerCfg {
        &self.cfg
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// One loop iteration: acquire and map. Returns true when the value changed.
    ///
    /// While locked nothing is read and `Ok(false)` is returned.
    pub fn poll(&mut self) -> Result<bool> {
        if self.locked {
            return Ok(false);
        }
        self.sample = self.sampler.acquire(&mut self.input)?;
        let now = self.clock.millis();
        let before = self.mapper.value();
        let changed = self.mapper.update(self.sample, now);
        if changed {
            tracing::trace!(
                sample = self.sample,
                from = before,
                to = self.mapper.value(),
                "value changed"
            );
        }
        Ok(changed)
    }

    /// Coarse -1/0/+1 tick since the last emitted tick. Idle while locked.
    pub fn direction(&mut self) -> Direction {
        if self.locked {
            return Direction::Idle;
        }
        self.direction.emit(self.sample, self.clock.millis())
    }

    /// Re-anchor so the current reading maps to `target`.
    ///
    /// Targets outside the range are rejected with `TunerError::OutOfRange`
    /// and nothing changes. While locked the frozen reading is used.
    pub fn set(&mut self, target: i64) -> Result<()> {
        let range = *self.mapper.range();
        if !range.contains(target) {
            tracing::debug!(target, "set rejected: out of range");
            return Err(eyre::Report::new(TunerError::OutOfRange {
                target,
                start: range.start,
                end: range.end,
            }));
        }
        self.refresh_sample()?;
        self.mapper.set(target, self.sample)?;
        tracing::debug!(target, sample = self.sample, base = self.mapper.base(), "set");
        Ok(())
    }

    /// Like [`set`](Self::set) but clamps out-of-range targets to the nearest
    /// bound. Returns the value applied.
    pub fn set_clamped(&mut self, target: i64) -> Result<i64> {
        self.refresh_sample()?;
        let v = self.mapper.set_clamped(target, self.sample);
        tracing::debug!(target, applied = v, "set (clamped)");
        Ok(v)
    }

    /// Replace the range and step sizes and re-anchor at the new start.
    pub fn reinit(&mut self, range: RangeCfg) -> Result<()> {
        let mut cfg = self.cfg;
        cfg.range = range;
        validate(&cfg)?;
        self.refresh_sample()?;
        self.cfg = cfg;
        self.mapper = PositionMapper::new(range, self.cfg.hysteresis, self.cfg.edge, self.sample);
        self.direction.resync(self.sample);
        tracing::debug!(start = range.start, end = range.end, "tuner re-initialized");
        Ok(())
    }

    /// Freeze sampling and mapping, keeping the current value.
    pub fn lock(&mut self) {
        if !self.cfg.lock.allow {
            tracing::warn!("lock requested but locking is disabled");
            return;
        }
        if !self.locked {
            tracing::debug!(value = self.mapper.value(), "tuner locked");
        }
        self.locked = true;
    }

    /// Resume sampling and mapping.
    pub fn unlock(&mut self) {
        if self.locked {
            tracing::debug!("tuner unlocked");
        }
        self.locked = false;
    }

    fn refresh_sample(&mut self) -> Result<()> {
        if !self.locked {
            self.sample = self.sampler.acquire(&mut self.input)?;
        }
        Ok(())
    }
}
