pub mod error;
#[cfg(feature = "hardware")]
pub mod mcp3008;

use std::cell::Cell;
use std::rc::Rc;

use yatuli_traits::AnalogInput;

use crate::error::HwError;

/// Full-scale reading of the simulated 10-bit converter.
pub const SIM_ADC_MAX: u16 = 1023;

#[derive(Debug, Default)]
struct PotState {
    raw: Cell<u16>,
    jitter: Cell<u16>,
    disconnected: Cell<bool>,
    reads: Cell<u64>,
    configured: Cell<Option<u8>>,
    noise: Cell<u32>,
}

/// Simulated potentiometer wiper on a 10-bit converter.
///
/// The wiper is moved through a [`PotHandle`]; every read returns the wiper
/// position plus deterministic noise of up to `jitter` counts either way.
pub struct SimulatedPot {
    state: Rc<PotState>,
}

/// Test/simulation side of a [`SimulatedPot`].
#[derive(Clone)]
pub struct PotHandle {
    state: Rc<PotState>,
}

impl SimulatedPot {
    /// A pot resting at mid travel with no noise.
    pub fn new() -> (Self, PotHandle) {
        Self::at(SIM_ADC_MAX / 2)
    }

    pub fn at(raw: u16) -> (Self, PotHandle) {
        let state = Rc::new(PotState::default());
        state.raw.set(raw.min(SIM_ADC_MAX));
        state.noise.set(0x9E37_79B9);
        (
            Self {
                state: state.clone(),
            },
            PotHandle { state },
        )
    }

    fn next_noise(&self) -> i32 {
        let amp = i32::from(self.state.jitter.get());
        if amp == 0 {
            return 0;
        }
        // xorshift32
        let mut x = self.state.noise.get();
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state.noise.set(x);
        (x % (2 * amp as u32 + 1)) as i32 - amp
    }
}

impl AnalogInput for SimulatedPot {
    fn configure_input(&mut self, pin: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::debug!(pin, "simulated pot configured as input");
        self.state.configured.set(Some(pin));
        Ok(())
    }

    fn read_raw(&mut self, _pin: u8) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        if self.state.disconnected.get() {
            return Err(Box::new(HwError::Disconnected));
        }
        self.state.reads.set(self.state.reads.get() + 1);
        let v = i32::from(self.state.raw.get()) + self.next_noise();
        Ok(v.clamp(0, i32::from(SIM_ADC_MAX)) as u16)
    }
}

impl PotHandle {
    /// Move the wiper to a raw converter reading.
    pub fn set_raw(&self, raw: u16) {
        self.state.raw.set(raw.min(SIM_ADC_MAX));
    }

    /// Move the wiper to a fraction of its travel (0.0 ..= 1.0).
    pub fn set_position(&self, fraction: f32) {
        let f = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.set_raw((f * f32::from(SIM_ADC_MAX)).round() as u16);
    }

    pub fn raw(&self) -> u16 {
        self.state.raw.get()
    }

    /// Noise amplitude in raw counts added to every read.
    pub fn set_jitter(&self, counts: u16) {
        self.state.jitter.set(counts);
    }

    /// Make subsequent reads fail until reconnected.
    pub fn set_disconnected(&self, disconnected: bool) {
        self.state.disconnected.set(disconnected);
    }

    /// Number of successful raw reads so far.
    pub fn reads(&self) -> u64 {
        self.state.reads.get()
    }

    /// Pin passed to `configure_input`, if it has been called.
    pub fn configured_pin(&self) -> Option<u8> {
        self.state.configured.get()
    }
}

#[cfg(feature = "hardware")]
pub use hardware::HardwareAdc;

#[cfg(feature = "hardware")]
pub mod hardware {
    use rppal::spi::{Bus, SlaveSelect};
    use yatuli_traits::AnalogInput;

    use crate::error::HwError;
    use crate::mcp3008::{MAX_CHANNEL, Mcp3008};

    /// Analog input backed by an MCP3008 on SPI0/CE0.
    pub struct HardwareAdc {
        adc: Mcp3008,
    }

    impl HardwareAdc {
        pub fn new(clock_hz: u32) -> Result<Self, HwError> {
            Self::on(Bus::Spi0, SlaveSelect::Ss0, clock_hz)
        }

        pub fn on(bus: Bus, slave: SlaveSelect, clock_hz: u32) -> Result<Self, HwError> {
            Ok(Self {
                adc: Mcp3008::new(bus, slave, clock_hz)?,
            })
        }
    }

    impl AnalogInput for HardwareAdc {
        fn configure_input(
            &mut self,
            pin: u8,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            // Channels are always inputs on the MCP3008; only the index needs checking.
            if pin > MAX_CHANNEL {
                return Err(Box::new(HwError::InvalidChannel(pin)));
            }
            tracing::debug!(channel = pin, "mcp3008 channel selected");
            Ok(())
        }

        fn read_raw(&mut self, pin: u8) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
            match self.adc.read_channel(pin) {
                Ok(raw) => Ok(raw),
                Err(e) => {
                    tracing::error!("adc read error: {}", e);
                    Err(Box::new(e))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::mid_travel(0.5, 512)]
    #[case::full_ccw(0.0, 0)]
    #[case::full_cw(1.0, SIM_ADC_MAX)]
    #[case::beyond_travel(1.7, SIM_ADC_MAX)]
    #[case::not_a_number(f32::NAN, 0)]
    fn test_simulated_pot_position_maps_to_raw(#[case] position: f32, #[case] raw: u16) {
        let (mut pot, handle) = SimulatedPot::new();
        handle.set_position(position);
        assert_eq!(handle.raw(), raw);
        assert_eq!(pot.read_raw(0).unwrap(), raw);
    }

    #[rstest]
    fn test_simulated_pot_follows_handle() {
        let (mut pot, handle) = SimulatedPot::new();
        assert_eq!(pot.read_raw(0).unwrap(), 511);
        handle.set_raw(900);
        assert_eq!(pot.read_raw(0).unwrap(), 900);
        handle.set_raw(5000);
        assert_eq!(pot.read_raw(0).unwrap(), SIM_ADC_MAX);
        assert_eq!(handle.reads(), 3);
    }

    #[rstest]
    #[case(500, 1)]
    #[case(500, 2)]
    #[case(1, 3)]
    #[case(1022, 4)]
    fn test_simulated_pot_jitter_is_bounded(#[case] raw: u16, #[case] jitter: u16) {
        let (mut pot, handle) = SimulatedPot::at(raw);
        handle.set_jitter(jitter);
        let lo = raw.saturating_sub(jitter);
        let hi = (raw + jitter).min(SIM_ADC_MAX);
        let mut seen_other = false;
        for _ in 0..500 {
            let v = pot.read_raw(0).unwrap();
            assert!((lo..=hi).contains(&v), "read {v} outside jitter band");
            seen_other |= v != raw;
        }
        assert!(seen_other);
    }

    #[rstest]
    fn test_simulated_pot_disconnect() {
        let (mut pot, handle) = SimulatedPot::new();
        handle.set_disconnected(true);
        let err = pot.read_raw(0).expect_err("disconnected read must fail");
        assert!(err.downcast_ref::<HwError>().is_some());
        assert_eq!(handle.reads(), 0);
        handle.set_disconnected(false);
        assert!(pot.read_raw(0).is_ok());
    }

    #[rstest]
    fn test_configure_records_pin() {
        let (mut pot, handle) = SimulatedPot::new();
        assert_eq!(handle.configured_pin(), None);
        pot.configure_input(4).unwrap();
        assert_eq!(handle.configured_pin(), Some(4));
    }
}
