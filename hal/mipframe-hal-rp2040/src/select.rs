//! Chip select output

use embassy_rp::gpio::{AnyPin, Level, Output};
use embassy_rp::Peri;
use mipframe_hal::OutputPin;

/// GPIO output driving the panel's chip select
///
/// `Output` writes through the SIO set/clear aliases, so toggling it from
/// the DMA interrupt does not race the foreground.
pub struct SelectPin {
    pin: Output<'static>,
}

impl SelectPin {
    /// Take `pin` as an output, driven low
    pub fn new(pin: Peri<'static, AnyPin>) -> Self {
        Self {
            pin: Output::new(pin, Level::Low),
        }
    }
}

impl OutputPin for SelectPin {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}
