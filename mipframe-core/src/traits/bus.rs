//! Bus bring-up trait

use mipframe_hal::{FrameTransfer, OneShotAlarm, OutputPin, SpiConfig};

use crate::error::DisplayError;

/// Bus and pin selection passed to `init`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusParams {
    /// SPI peripheral index
    pub bus_id: u8,
    /// Serial clock pin
    pub clock_pin: u8,
    /// Serial data out pin
    pub data_pin: u8,
    /// Chip select pin (active high)
    pub select_pin: u8,
}

impl BusParams {
    pub const fn new(bus_id: u8, clock_pin: u8, data_pin: u8, select_pin: u8) -> Self {
        Self {
            bus_id,
            clock_pin,
            data_pin,
            select_pin,
        }
    }

    /// All pins as an array
    pub const fn pins(&self) -> [u8; 3] {
        [self.clock_pin, self.data_pin, self.select_pin]
    }

    /// No pin is used for two functions
    pub const fn pins_distinct(&self) -> bool {
        self.clock_pin != self.data_pin
            && self.clock_pin != self.select_pin
            && self.data_pin != self.select_pin
    }
}

/// Peripherals the scheduler drives
pub struct Hardware<CS, TX, AL> {
    pub select: CS,
    pub transfer: TX,
    pub alarm: AL,
}

/// Board-specific bring-up
///
/// Implemented by chip HALs. `claim` performs the one-time configuration
/// (clocking, pin functions, DMA channel) and must leave nothing claimed
/// when it fails.
pub trait Bus {
    type Select: OutputPin;
    type Transfer: FrameTransfer;
    type Alarm: OneShotAlarm;

    /// Whether `bus_id` names a serial bus this board has
    fn supports(&self, bus_id: u8) -> bool;

    /// Reject unusable parameters before touching hardware
    fn validate(&self, params: &BusParams) -> Result<(), DisplayError> {
        if !self.supports(params.bus_id) || !params.pins_distinct() {
            return Err(DisplayError::InvalidConfig);
        }
        Ok(())
    }

    /// Configure the bus and claim a DMA channel
    ///
    /// Fails with `ResourceExhausted` when no DMA channel is free.
    fn claim(
        &mut self,
        params: &BusParams,
        spi: &SpiConfig,
    ) -> Result<Hardware<Self::Select, Self::Transfer, Self::Alarm>, DisplayError>;
}
