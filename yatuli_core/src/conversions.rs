//! `From` implementations bridging `yatuli_config` types to `yatuli_core` types.

use crate::config::{
    DirectionCfg, EdgeCfg, HysteresisCfg, LockCfg, RangeCfg, SamplerCfg, TunerCfg,
};

impl From<&yatuli_config::TunerCfg> for RangeCfg {
    fn from(c: &yatuli_config::TunerCfg) -> Self {
        Self {
            start: c.range_start,
            end: c.range_end,
            step: c.step,
            edge_step: c.edge_step,
        }
    }
}

impl From<&yatuli_config::SamplerCfg> for SamplerCfg {
    fn from(c: &yatuli_config::SamplerCfg) -> Self {
        Self {
            oversample: c.oversample,
            resolution: c.resolution,
            adc_min: c.adc_min,
            adc_max: c.adc_max,
            invert: c.invert,
        }
    }
}

impl From<&yatuli_config::HysteresisCfg> for HysteresisCfg {
    fn from(c: &yatuli_config::HysteresisCfg) -> Self {
        Self {
            dead_band: c.dead_band,
            counts_per_step: c.counts_per_step,
        }
    }
}

impl From<&yatuli_config::EdgeCfg> for EdgeCfg {
    fn from(c: &yatuli_config::EdgeCfg) -> Self {
        Self {
            high: c.high,
            low: c.low,
            pace_ms: c.pace_ms,
        }
    }
}

impl From<&yatuli_config::DirectionCfg> for DirectionCfg {
    fn from(c: &yatuli_config::DirectionCfg) -> Self {
        Self {
            ticks: c.ticks,
            paced: c.paced,
            pace_ms: c.pace_ms,
        }
    }
}

impl From<&yatuli_config::LockCfg> for LockCfg {
    fn from(c: &yatuli_config::LockCfg) -> Self {
        Self { allow: c.allow }
    }
}

impl From<&yatuli_config::Config> for TunerCfg {
    fn from(c: &yatuli_config::Config) -> Self {
        Self {
            pin: c.tuner.pin,
            range: RangeCfg::from(&c.tuner),
            sampler: SamplerCfg::from(&c.sampler),
            hysteresis: HysteresisCfg::from(&c.hysteresis),
            edge: EdgeCfg::from(&c.edge),
            direction: DirectionCfg::from(&c.direction),
            lock: LockCfg::from(&c.lock),
        }
    }
}
