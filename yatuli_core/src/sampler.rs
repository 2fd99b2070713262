//! ADC oversampling.
//!
//! Reads the analog input `oversample` times back to back, averages, scales
//! by `resolution` and shifts so mid-travel reads as zero. With the defaults
//! (100 reads, x10, 10-bit ADC) a full turn spans about -5115..=+5115.
use eyre::WrapErr;
use yatuli_traits::AnalogInput;

use crate::config::SamplerCfg;
use crate::error::Result;
use crate::hw_error::map_hw_error;

#[derive(Debug, Clone)]
pub struct Oversampler {
    cfg: SamplerCfg,
    pin: u8,
    // (adc_min + adc_max) * resolution / 2, the scaled reading at mid-travel
    mid: i64,
}

impl Oversampler {
    pub fn new(pin: u8, cfg: SamplerCfg) -> Self {
        let mid = (i64::from(cfg.adc_min) + i64::from(cfg.adc_max)) * i64::from(cfg.resolution) / 2;
        Self { cfg, pin, mid }
    }

    pub fn cfg(&self) -> &SamplerCfg {
        &self.cfg
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Take `oversample` raw reads and return the centered reading.
    pub fn acquire<A: AnalogInput + ?Sized>(&self, input: &mut A) -> Result<i32> {
        let n = self.cfg.oversample.max(1);
        let mut sum: u64 = 0;
        for _ in 0..n {
            let raw = input
                .read_raw(self.pin)
                .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
                .wrap_err("reading analog input")?;
            sum += u64::from(raw);
        }
        Ok(self.center(sum))
    }

    /// Convert a sum of `oversample` raw reads into a centered reading.
    pub fn center(&self, sum: u64) -> i32 {
        let n = i128::from(self.cfg.oversample.max(1));
        let scaled = i128::from(sum) * i128::from(self.cfg.resolution) / n;
        let mut c = scaled - i128::from(self.mid);
        if self.cfg.invert {
            c = -c;
        }
        c.clamp(i128::from(i32::MIN), i128::from(i32::MAX)) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::ScriptedInput;

    #[test]
    fn default_config_centers_ten_bit_adc() {
        let s = Oversampler::new(0, SamplerCfg::default());
        assert_eq!(s.center(0), -5115);
        assert_eq!(s.center(1023 * 100), 5115);
        assert_eq!(s.center(512 * 100), 5);
        assert_eq!(s.center(511 * 100), -5);
    }

    #[test]
    fn plain_averaging_without_extra_resolution() {
        let cfg = SamplerCfg {
            oversample: 5,
            resolution: 1,
            ..SamplerCfg::default()
        };
        let s = Oversampler::new(0, cfg);
        assert_eq!(s.center(0), -511);
        assert_eq!(s.center(1023 * 5), 512);
    }

    #[test]
    fn oversample_and_decimate_identity() {
        // 4^2 reads, shift by 2 bits: 10-bit ADC becomes 12-bit
        let cfg = SamplerCfg {
            oversample: 16,
            resolution: 4,
            ..SamplerCfg::default()
        };
        let s = Oversampler::new(0, cfg);
        let sum = 1023u64 * 16;
        assert_eq!(s.center(sum), (sum >> 2) as i32 - 2046);
    }

    #[test]
    fn inverted_wiring_flips_sign() {
        let cfg = SamplerCfg {
            invert: true,
            ..SamplerCfg::default()
        };
        let s = Oversampler::new(0, cfg);
        assert_eq!(s.center(1023 * 100), -5115);
    }

    #[test]
    fn acquire_reads_oversample_times_and_averages() {
        let cfg = SamplerCfg {
            oversample: 4,
            resolution: 1,
            ..SamplerCfg::default()
        };
        let s = Oversampler::new(2, cfg);
        let mut input = ScriptedInput::new([500, 502, 504, 506]);
        // mean 503, centered by 511
        assert_eq!(s.acquire(&mut input).unwrap(), -8);
        assert_eq!(input.reads(), 4);
    }

    #[test]
    fn acquire_propagates_read_failure() {
        let s = Oversampler::new(0, SamplerCfg::default());
        let err = s
            .acquire(&mut crate::mocks::FailingInput)
            .expect_err("failing input must error");
        assert!(format!("{err:#}").contains("hardware"));
    }
}
