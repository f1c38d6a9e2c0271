//! RP2040 SPI pin muxing rules
//!
//! Each GPIO can carry exactly one SPI signal of one block, so a bus id
//! and pin selection is either wired correctly or not at all.

/// Maximum number of GPIO pins on RP2040
pub const GPIO_COUNT: u8 = 30;

/// Error when checking a pin selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin cannot carry the requested function
    WrongFunction,
    /// Pin was not handed to the display bus
    NotWired,
}

/// Role of a pin within an SPI block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiSignal {
    Rx,
    Cs,
    Sck,
    Tx,
}

/// SPI block and signal a pin carries when muxed to the SPI function
///
/// Pins 0-7 and 16-23 belong to SPI0, 8-15 and 24-29 to SPI1; within a
/// group of four the order is RX, CSn, SCK, TX.
pub const fn spi_signal(pin: u8) -> Option<(u8, SpiSignal)> {
    if pin >= GPIO_COUNT {
        return None;
    }
    let bus = (pin / 8) % 2;
    let signal = match pin % 4 {
        0 => SpiSignal::Rx,
        1 => SpiSignal::Cs,
        2 => SpiSignal::Sck,
        _ => SpiSignal::Tx,
    };
    Some((bus, signal))
}

/// Check `pin` can carry `signal` of SPI block `bus`
pub fn check_spi_pin(pin: u8, bus: u8, signal: SpiSignal) -> Result<(), PinError> {
    match spi_signal(pin) {
        None => Err(PinError::InvalidPin),
        Some(found) if found == (bus, signal) => Ok(()),
        Some(_) => Err(PinError::WrongFunction),
    }
}
