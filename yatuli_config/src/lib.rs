#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and sweep parsing for the tuning engine.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Sweep CSV loader enforces headers and derives the usable ADC span of a
//!   potentiometer that never reaches the converter rails.
use serde::Deserialize;

/// Sweep CSV schema.
///
/// Expected headers:
/// raw,position
///
/// `position` is the fraction of mechanical travel (0.0 ..= 1.0) at which
/// `raw` was recorded.
///
/// Example:
/// raw,position
/// 12,0.0
/// 508,0.5
/// 1001,1.0
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SweepRow {
    pub raw: u16,
    pub position: f32,
}

#[derive(Debug, Deserialize)]
pub struct TunerCfg {
    /// Analog pin the wiper is wired to.
    pub pin: u8,
    pub range_start: i64,
    pub range_end: i64,
    /// Minimum step; values below 10 are raised to 10 by the core.
    #[serde(default = "default_step")]
    pub step: u32,
    /// Jump applied per pace while the knob is held at an end stop. 0 disables.
    #[serde(default)]
    pub edge_step: u32,
}

fn default_step() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SamplerCfg {
    /// Raw reads averaged per poll.
    pub oversample: u32,
    /// Extra resolution factor applied to the mean before centering.
    pub resolution: u32,
    /// Lowest raw reading of the pot (0 for a rail-to-rail wiper).
    pub adc_min: u16,
    /// Highest raw reading of the pot (1023 for a 10-bit converter).
    pub adc_max: u16,
    /// Flip the reading for pots wired with swapped ends.
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

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HysteresisCfg {
    /// Reversal must exceed this many sample counts to be accepted.
    pub dead_band: u32,
    /// Sample counts per value step.
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

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EdgeCfg {
    /// Centered reading above which the knob counts as pinned high.
    pub high: i32,
    /// Centered reading below which the knob counts as pinned low.
    pub low: i32,
    /// Minimum time between edge jumps.
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

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DirectionCfg {
    /// Sample counts of travel per emitted tick.
    pub ticks: u32,
    /// Rate-limit ticks to one per `pace_ms`.
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

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LockCfg {
    /// When false, lock requests are ignored.
    pub allow: bool,
}

impl Default for LockCfg {
    fn default() -> Self {
        Self { allow: true }
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub tuner: TunerCfg,
    #[serde(default)]
    pub sampler: SamplerCfg,
    #[serde(default)]
    pub hysteresis: HysteresisCfg,
    #[serde(default)]
    pub edge: EdgeCfg,
    #[serde(default)]
    pub direction: DirectionCfg,
    #[serde(default)]
    pub lock: LockCfg,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Usable span of a potentiometer derived from an end-to-end sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sweep {
    pub adc_min: u16,
    pub adc_max: u16,
    /// Raw readings fall as the knob turns clockwise.
    pub inverted: bool,
}

impl Sweep {
    /// Build a sweep from rows ordered by increasing `position`.
    pub fn from_rows(rows: &[SweepRow]) -> eyre::Result<Self> {
        if rows.len() < 2 {
            eyre::bail!("sweep requires at least two rows, got {}", rows.len());
        }

        for (i, pair) in rows.windows(2).enumerate() {
            if !pair[1].position.is_finite() || pair[1].position <= pair[0].position {
                eyre::bail!(
                    "sweep positions must be strictly increasing (rows {} and {})",
                    i,
                    i + 1
                );
            }
        }
        if rows
            .iter()
            .any(|r| !(0.0..=1.0).contains(&r.position))
        {
            eyre::bail!("sweep positions must be within [0.0, 1.0]");
        }

        // Raw readings must move one way only; a zig-zag means a bad wiper.
        let mut dir: i8 = 0;
        for (i, pair) in rows.windows(2).enumerate() {
            let d = i32::from(pair[1].raw) - i32::from(pair[0].raw);
            if d == 0 {
                eyre::bail!(
                    "sweep rows have duplicate raw values at index {} and {}",
                    i,
                    i + 1
                );
            }
            let step_dir = if d > 0 { 1 } else { -1 };
            if dir == 0 {
                dir = step_dir;
            } else if dir != step_dir {
                eyre::bail!(
                    "sweep raw values must be monotonic (strictly increasing or strictly decreasing)"
                );
            }
        }

        let adc_min = rows.iter().map(|r| r.raw).min().unwrap_or(0);
        let adc_max = rows.iter().map(|r| r.raw).max().unwrap_or(0);
        Ok(Self {
            adc_min,
            adc_max,
            inverted: dir < 0,
        })
    }

    /// Apply the sweep to a sampler section.
    pub fn apply(&self, sampler: &mut SamplerCfg) {
        sampler.adc_min = self.adc_min;
        sampler.adc_max = self.adc_max;
        sampler.invert = self.inverted;
    }
}

impl TryFrom<&[SweepRow]> for Sweep {
    type Error = eyre::Report;
    fn try_from(rows: &[SweepRow]) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

pub fn load_sweep_csv(path: &std::path::Path) -> eyre::Result<Sweep> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open sweep CSV {:?}: {}", path, e))?;

    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["raw", "position"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "sweep CSV must have headers 'raw,position', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<SweepRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    Sweep::from_rows(&rows)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Tuner
        if self.tuner.range_end < self.tuner.range_start {
            eyre::bail!("tuner.range_end must be >= tuner.range_start");
        }

        // Sampler
        if self.sampler.oversample == 0 {
            eyre::bail!("sampler.oversample must be >= 1");
        }
        if self.sampler.oversample > 4096 {
            eyre::bail!("sampler.oversample is unreasonably large (>4096)");
        }
        if self.sampler.resolution == 0 {
            eyre::bail!("sampler.resolution must be >= 1");
        }
        if self.sampler.adc_max <= self.sampler.adc_min {
            eyre::bail!("sampler.adc_max must be > sampler.adc_min");
        }

        // Hysteresis
        if self.hysteresis.counts_per_step == 0 {
            eyre::bail!("hysteresis.counts_per_step must be >= 1");
        }

        // Edge
        if self.edge.low >= self.edge.high {
            eyre::bail!("edge.low must be < edge.high");
        }
        if self.edge.pace_ms == 0 {
            eyre::bail!("edge.pace_ms must be >= 1");
        }
        let half_span = (i64::from(self.sampler.adc_max) - i64::from(self.sampler.adc_min))
            * i64::from(self.sampler.resolution)
            / 2;
        if i64::from(self.edge.high) >= half_span || -i64::from(self.edge.low) >= half_span {
            eyre::bail!("edge thresholds must lie inside the sampler span (+/-{half_span})");
        }

        // Direction
        if self.direction.ticks == 0 {
            eyre::bail!("direction.ticks must be >= 1");
        }
        if self.direction.paced && self.direction.pace_ms == 0 {
            eyre::bail!("direction.pace_ms must be >= 1 when direction.paced is set");
        }

        Ok(())
    }
}
