use rppal::spi::{Bus, Mode, SlaveSelect, Spi};
use tracing::trace;

use crate::error::{HwError, Result};

/// Highest channel index on the MCP3008.
pub const MAX_CHANNEL: u8 = 7;

/// MCP3008 8-channel 10-bit SAR converter on the Pi's SPI bus.
pub struct Mcp3008 {
    spi: Spi,
}

impl Mcp3008 {
    pub fn new(bus: Bus, slave: SlaveSelect, clock_hz: u32) -> Result<Self> {
        let spi = Spi::new(bus, slave, clock_hz, Mode::Mode0)
            .map_err(|e| HwError::Spi(e.to_string()))?;
        Ok(Self { spi })
    }

    /// Single-ended conversion on `channel`, 0..=1023.
    pub fn read_channel(&mut self, channel: u8) -> Result<u16> {
        if channel > MAX_CHANNEL {
            return Err(HwError::InvalidChannel(channel));
        }
        // start bit, then SGL/DIFF=1 and the channel in the high nibble
        let tx = [0x01, (0x08 | channel) << 4, 0x00];
        let mut rx = [0u8; 3];
        self.spi
            .transfer(&mut rx, &tx)
            .map_err(|e| HwError::Spi(e.to_string()))?;
        let raw = (u16::from(rx[1] & 0x03) << 8) | u16::from(rx[2]);
        trace!(channel, raw, "mcp3008 raw read");
        Ok(raw)
    }
}
