//! GPIO pin abstractions
//!
//! The refresh engine only drives outputs: the chip select line that
//! frames each transfer.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip. Every method must be callable from interrupt
/// context.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Chip select wrapper that knows the line's active level
///
/// MIP panels latch a frame while chip select is *high*, the opposite of
/// most SPI peripherals, so the level is a property of the wiring.
pub struct ChipSelect<P> {
    pin: P,
    active_high: bool,
}

impl<P: OutputPin> ChipSelect<P> {
    /// Wrap a pin, leaving the line deasserted
    pub fn new(pin: P, active_high: bool) -> Self {
        let mut cs = Self { pin, active_high };
        cs.deassert();
        cs
    }

    /// Active-high chip select (memory-in-pixel panels)
    pub fn active_high(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Drive the line to its active level
    pub fn assert(&mut self) {
        self.pin.set_state(self.active_high);
    }

    /// Drive the line to its idle level
    pub fn deassert(&mut self) {
        self.pin.set_state(!self.active_high);
    }

    /// Whether the line is currently at its active level
    pub fn is_asserted(&self) -> bool {
        self.pin.is_set_high() == self.active_high
    }

    /// Give back the underlying pin
    pub fn release(self) -> P {
        self.pin
    }
}
