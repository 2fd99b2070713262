pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// Analog input the tuner samples from.
///
/// `pin` identifies the channel; implementations backed by a single-channel
/// converter may ignore it.
pub trait AnalogInput {
    fn configure_input(&mut self, pin: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn read_raw(&mut self, pin: u8) -> Result<u16, Box<dyn std::error::Error + Send + Sync>>;
}

impl<A: AnalogInput + ?Sized> AnalogInput for Box<A> {
    fn configure_input(&mut self, pin: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).configure_input(pin)
    }

    fn read_raw(&mut self, pin: u8) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read_raw(pin)
    }
}
