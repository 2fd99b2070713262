//! Configuration types for the tuning engine.
//!
//! These are the runtime configuration structs used by `TunerCore`.
//! They are separate from the TOML-deserialized config in `yatuli_config`.

/// Smallest step the mapper will honour; lower requests are raised to this.
pub const MIN_STEP: u32 = 10;

/// Application value range and step sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeCfg {
    /// Inclusive lower bound of the value.
    pub start: i64,
    /// Inclusive upper bound of the value.
    pub end: i64,
    /// Value increment per mapped unit of travel. Floored to [`MIN_STEP`].
    pub step: u32,
    /// Increment per pace while the knob is held at an end stop. 0 disables edge jumps.
    pub edge_step: u32,
}

impl RangeCfg {
    pub fn new(start: i64, end: i64, step: u32, edge_step: u32) -> Self {
        Self {
            start,
            end,
            step,
            edge_step,
        }
    }

    #[inline]
    pub fn contains(&self, v: i64) -> bool {
        (self.start..=self.end).contains(&v)
    }
}

/// ADC acquisition settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerCfg {
    /// Raw reads averaged per acquisition.
    pub oversample: u32,
    /// Resolution multiplier applied to the mean before centering.
    /// `oversample = 4^n, resolution = 2^n` is classic oversample-and-decimate.
    pub resolution: u32,
    /// Lowest raw reading the pot produces.
    pub adc_min: u16,
    /// Highest raw reading the pot produces.
    pub adc_max: u16,
    /// Negate the reading (pot wired with its ends swapped).
    pub invert: bool,
}

impl Default for SamplerCfg {
    fn default() -> Self {
        Self {
            oversample: 100,
            resolution: 10,
            adc_min: 0,
            adc_max: 1023,
            invert: false,
        }
    }
}

impl SamplerCfg {
    /// Largest centered reading magnitude this configuration can produce.
    pub fn half_span(&self) -> i64 {
        (i64::from(self.adc_max) - i64::from(self.adc_min)) * i64::from(self.resolution) / 2
    }
}

/// Flutter rejection and linear mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HysteresisCfg {
    /// A reversal must move more than this many sample counts to be accepted.
    pub dead_band: u32,
    /// Sample counts per mapped unit (one `step` of value).
    pub counts_per_step: u32,
}

impl Default for HysteresisCfg {
    fn default() -> Self {
        Self {
            dead_band: 5,
            counts_per_step: 10,
        }
    }
}

/// End-of-travel auto-advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeCfg {
    /// Centered reading above which the knob is pinned high.
    pub high: i32,
    /// Centered reading below which the knob is pinned low.
    pub low: i32,
    /// Minimum milliseconds between edge jumps.
    pub pace_ms: u32,
}

impl Default for EdgeCfg {
    fn default() -> Self {
        Self {
            high: 5000,
            low: -5000,
            pace_ms: 500,
        }
    }
}

/// Coarse direction ticks for menu navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionCfg {
    /// Sample counts of travel per tick (500 gives about 20 ticks per turn at defaults).
    pub ticks: u32,
    /// Allow at most one tick per `pace_ms`.
    pub paced: bool,
    pub pace_ms: u32,
}

impl Default for DirectionCfg {
    fn default() -> Self {
        Self {
            ticks: 500,
            paced: false,
            pace_ms: 500,
        }
    }
}

/// Lock behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockCfg {
    /// When false, `lock()` is ignored.
    pub allow: bool,
}

impl Default for LockCfg {
    fn default() -> Self {
        Self { allow: true }
    }
}

/// Everything a tuner needs besides its input and clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TunerCfg {
    pub pin: u8,
    pub range: RangeCfg,
    pub sampler: SamplerCfg,
    pub hysteresis: HysteresisCfg,
    pub edge: EdgeCfg,
    pub direction: DirectionCfg,
    pub lock: LockCfg,
}

impl TunerCfg {
    /// Defaults for everything but the pin and range.
    pub fn new(pin: u8, range: RangeCfg) -> Self {
        Self {
            pin,
            range,
            sampler: SamplerCfg::default(),
            hysteresis: HysteresisCfg::default(),
            edge: EdgeCfg::default(),
            direction: DirectionCfg::default(),
            lock: LockCfg::default(),
        }
    }
}
