//! Type-state builder for `Tuner` and generic `build_tuner` constructor.
//!
//! The builder enforces at compile time that an input and a range are provided
//! before `build()` is available. `try_build()` is always available for dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;

use yatuli_traits::{AnalogInput, Clock, MonotonicClock};

use crate::config::*;
use crate::direction::Direction;
use crate::error::{BuildError, Result};
use crate::tuner::TunerCore;

// ── Public dynamic-dispatch wrapper ──────────────────────────────────────────

/// Tuner over a boxed analog input.
pub struct Tuner {
    pub(crate) inner: TunerCore<Box<dyn AnalogInput>>,
}

impl core::fmt::Debug for Tuner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tuner")
            .field("value", &self.inner.value())
            .field("sample", &self.inner.sample())
            .field("locked", &self.inner.is_locked())
            .finish()
    }
}

impl Tuner {
    /// Start building a Tuner.
    pub fn builder() -> TunerBuilder<Missing, Missing> {
        TunerBuilder::default()
    }

    /// One loop iteration; true when the value changed.
    pub fn poll(&mut self) -> Result<bool> {
        self.inner.poll()
    }

    pub fn value(&self) -> i64 {
        self.inner.value()
    }

    pub fn direction(&mut self) -> Direction {
        self.inner.direction()
    }

    /// Re-anchor at `target`; rejected when outside the range.
    pub fn set(&mut self, target: i64) -> Result<()> {
        self.inner.set(target)
    }

    /// Re-anchor at `target` clamped into the range.
    pub fn set_clamped(&mut self, target: i64) -> Result<i64> {
        self.inner.set_clamped(target)
    }

    pub fn reinit(&mut self, range: RangeCfg) -> Result<()> {
        self.inner.reinit(range)
    }

    pub fn lock(&mut self) {
        self.inner.lock();
    }

    pub fn unlock(&mut self) {
        self.inner.unlock();
    }

    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }

    pub fn sample(&self) -> i32 {
        self.inner.sample()
    }

    pub fn range(&self) -> &RangeCfg {
        self.inner.range()
    }

    pub fn step(&self) -> u32 {
        self.inner.step()
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Tuner`. All fields are validated on `build()`.
pub struct TunerBuilder<I, R> {
    input: Option<Box<dyn AnalogInput>>,
    pin: u8,
    range: Option<RangeCfg>,
    sampler: Option<SamplerCfg>,
    hysteresis: Option<HysteresisCfg>,
    edge: Option<EdgeCfg>,
    direction: Option<DirectionCfg>,
    lock: Option<LockCfg>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    _i: PhantomData<I>,
    _r: PhantomData<R>,
}

impl Default for TunerBuilder<Missing, Missing> {
    fn default() -> Self {
        Self {
            input: None,
            pin: 0,
            range: None,
            sampler: None,
            hysteresis: None,
            edge: None,
            direction: None,
            lock: None,
            clock: None,
            _i: PhantomData,
            _r: PhantomData,
        }
    }
}

/// Validate a full configuration.
///
/// This is the single source of truth for validation, used by
/// `TunerBuilder::try_build()`, `build_tuner()` and `TunerCore::reinit()`.
pub(crate) fn validate(cfg: &TunerCfg) -> Result<()> {
    let invalid = |msg: &'static str| Err(eyre::Report::new(BuildError::InvalidConfig(msg)));

    if cfg.range.end < cfg.range.start {
        return invalid("range end must be >= start");
    }
    if cfg.sampler.oversample == 0 {
        return invalid("oversample must be >= 1");
    }
    if cfg.sampler.resolution == 0 {
        return invalid("resolution must be >= 1");
    }
    if cfg.sampler.adc_max <= cfg.sampler.adc_min {
        return invalid("adc_max must be > adc_min");
    }
    if cfg.hysteresis.counts_per_step == 0 {
        return invalid("counts_per_step must be >= 1");
    }
    if cfg.edge.low >= cfg.edge.high {
        return invalid("edge low threshold must be < high threshold");
    }
    let half_span = cfg.sampler.half_span();
    if i64::from(cfg.edge.high) >= half_span || -i64::from(cfg.edge.low) >= half_span {
        return invalid("edge thresholds unreachable within the sampler span");
    }
    if cfg.edge.pace_ms == 0 {
        return invalid("edge pace_ms must be >= 1");
    }
    if cfg.direction.ticks == 0 {
        return invalid("direction ticks must be >= 1");
    }
    if cfg.direction.paced && cfg.direction.pace_ms == 0 {
        return invalid("direction pace_ms must be >= 1 when paced");
    }
    if cfg.range.step < MIN_STEP {
        tracing::debug!(
            requested = cfg.range.step,
            applied = MIN_STEP,
            "step below minimum, raised"
        );
    }
    Ok(())
}

/// Build a statically dispatched tuner over any analog input.
///
/// Validates `cfg`, configures the pin and takes the first reading.
/// Uses a real monotonic clock unless one is supplied.
pub fn build_tuner<A: AnalogInput>(
    input: A,
    cfg: TunerCfg,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
) -> Result<TunerCore<A>> {
    validate(&cfg)?;
    let clock = clock.unwrap_or_else(|| Arc::new(MonotonicClock::new()));
    TunerCore::init(input, clock, cfg)
}

impl<I, R> TunerBuilder<I, R> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<Tuner> {
        let input = self
            .input
            .ok_or_else(|| eyre::Report::new(BuildError::MissingInput))?;
        let range = self
            .range
            .ok_or_else(|| eyre::Report::new(BuildError::MissingRange))?;

        let cfg = TunerCfg {
            pin: self.pin,
            range,
            sampler: self.sampler.unwrap_or_default(),
            hysteresis: self.hysteresis.unwrap_or_default(),
            edge: self.edge.unwrap_or_default(),
            direction: self.direction.unwrap_or_default(),
            lock: self.lock.unwrap_or_default(),
        };
        let clock: Option<Arc<dyn Clock + Send + Sync>> = self.clock.map(Arc::from);
        let inner = build_tuner(input, cfg, clock)?;
        Ok(Tuner { inner })
    }
}

/// Chainable setters that do not affect type-state.
impl<I, R> TunerBuilder<I, R> {
    pub fn with_pin(mut self, pin: u8) -> Self {
        self.pin = pin;
        self
    }

    pub fn with_sampler(mut self, sampler: SamplerCfg) -> Self {
        self.sampler = Some(sampler);
        self
    }

    pub fn with_hysteresis(mut self, hysteresis: HysteresisCfg) -> Self {
        self.hysteresis = Some(hysteresis);
        self
    }

    pub fn with_edge(mut self, edge: EdgeCfg) -> Self {
        self.edge = Some(edge);
        self
    }

    pub fn with_direction(mut self, direction: DirectionCfg) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_lock(mut self, lock: LockCfg) -> Self {
        self.lock = Some(lock);
        self
    }

    /// Inject a clock (e.g. `ManualClock` in tests).
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
}

impl<R> TunerBuilder<Missing, R> {
    pub fn with_input(self, input: impl AnalogInput + 'static) -> TunerBuilder<Set, R> {
        TunerBuilder {
            input: Some(Box::new(input)),
            pin: self.pin,
            range: self.range,
            sampler: self.sampler,
            hysteresis: self.hysteresis,
            edge: self.edge,
            direction: self.direction,
            lock: self.lock,
            clock: self.clock,
            _i: PhantomData,
            _r: PhantomData,
        }
    }
}

impl<I> TunerBuilder<I, Missing> {
    pub fn with_range(self, range: RangeCfg) -> TunerBuilder<I, Set> {
        TunerBuilder {
            input: self.input,
            pin: self.pin,
            range: Some(range),
            sampler: self.sampler,
            hysteresis: self.hysteresis,
            edge: self.edge,
            direction: self.direction,
            lock: self.lock,
            clock: self.clock,
            _i: PhantomData,
            _r: PhantomData,
        }
    }

    /// Apply every section of a loaded TOML config, including pin and range.
    pub fn with_config(self, cfg: &yatuli_config::Config) -> TunerBuilder<I, Set> {
        let tuner = TunerCfg::from(cfg);
        self.with_pin(tuner.pin)
            .with_sampler(tuner.sampler)
            .with_hysteresis(tuner.hysteresis)
            .with_edge(tuner.edge)
            .with_direction(tuner.direction)
            .with_lock(tuner.lock)
            .with_range(tuner.range)
    }
}

impl TunerBuilder<Set, Set> {
    pub fn build(self) -> Result<Tuner> {
        self.try_build()
    }
}
