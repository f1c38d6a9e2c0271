//! Display bus bring-up on RP2040
//!
//! The firmware hands over the SPI block, its clock and data pins, the
//! chip select pin and one DMA channel as owned peripherals. `init`
//! parameters are checked against the chip's fixed SPI muxing and against
//! what was actually handed over before anything is configured.

use embassy_rp::dma::AnyChannel;
use embassy_rp::gpio::{AnyPin, Pin};
use embassy_rp::spi::{ClkPin, Instance, MosiPin, Spi};
use embassy_rp::Peri;
use mipframe_core::{Bus, BusParams, DisplayError, Hardware};
use mipframe_hal::SpiConfig;

use crate::alarm::TimerAlarm;
use crate::dma::DmaFrameTransfer;
use crate::pins::{self, PinError, SpiSignal};
use crate::select::SelectPin;
use crate::spi::{self as spi_block, SpiBlock, SPI_COUNT};

/// Peripherals wired to the panel
pub struct BusPeripherals<T: Instance + 'static, C: ClkPin<T>, D: MosiPin<T>> {
    pub spi: Peri<'static, T>,
    pub clock: Peri<'static, C>,
    pub data: Peri<'static, D>,
    pub select: Peri<'static, AnyPin>,
    pub dma: Peri<'static, AnyChannel>,
}

impl<T: Instance + 'static, C: ClkPin<T>, D: MosiPin<T>> BusPeripherals<T, C, D> {
    /// Bus id and pin numbers these peripherals correspond to
    pub fn params(&self) -> BusParams {
        let clock_pin = self.clock.pin();
        // `ClkPin<T>` only exists for SCK pins, so the lookup cannot miss
        let bus_id = pins::spi_signal(clock_pin).map_or(SPI_COUNT, |(bus, _)| bus);
        BusParams::new(bus_id, clock_pin, self.data.pin(), self.select.pin())
    }
}

/// Check `params` against the SPI muxing and the board's wiring
pub fn check_wiring(params: &BusParams, wired: &BusParams) -> Result<(), PinError> {
    if params.pins().iter().any(|&pin| pin >= pins::GPIO_COUNT) {
        return Err(PinError::InvalidPin);
    }
    pins::check_spi_pin(params.clock_pin, params.bus_id, SpiSignal::Sck)?;
    pins::check_spi_pin(params.data_pin, params.bus_id, SpiSignal::Tx)?;

    if params != wired {
        return Err(PinError::NotWired);
    }
    Ok(())
}

/// Owner of the panel's peripherals until a display claims them
pub struct Rp2040Bus<T: Instance + 'static, C: ClkPin<T>, D: MosiPin<T>> {
    wired: BusParams,
    parts: Option<BusPeripherals<T, C, D>>,
    clk_peri_hz: u32,
}

impl<T: Instance + 'static, C: ClkPin<T>, D: MosiPin<T>> Rp2040Bus<T, C, D> {
    /// `clk_peri_hz` is the SPI source clock (`clk_peri`)
    pub fn new(parts: BusPeripherals<T, C, D>, clk_peri_hz: u32) -> Self {
        Self {
            wired: parts.params(),
            parts: Some(parts),
            clk_peri_hz,
        }
    }

    /// Bus id and pins the panel is wired to
    pub fn wired(&self) -> BusParams {
        self.wired
    }
}

impl<T: Instance + 'static, C: ClkPin<T>, D: MosiPin<T>> Bus for Rp2040Bus<T, C, D> {
    type Select = SelectPin;
    type Transfer = DmaFrameTransfer<T>;
    type Alarm = TimerAlarm;

    fn supports(&self, bus_id: u8) -> bool {
        bus_id < SPI_COUNT
    }

    fn validate(&self, params: &BusParams) -> Result<(), DisplayError> {
        if !self.supports(params.bus_id) || !params.pins_distinct() {
            return Err(DisplayError::InvalidConfig);
        }
        check_wiring(params, &self.wired).map_err(|_| DisplayError::InvalidConfig)
    }

    fn claim(
        &mut self,
        params: &BusParams,
        spi: &SpiConfig,
    ) -> Result<Hardware<SelectPin, DmaFrameTransfer<T>, TimerAlarm>, DisplayError> {
        self.validate(params)?;
        let block = SpiBlock::new(params.bus_id).ok_or(DisplayError::InvalidConfig)?;
        if !spi_block::frequency_supported(spi.frequency, self.clk_peri_hz) {
            return Err(DisplayError::InvalidConfig);
        }

        // Everything that can fail is checked before anything is taken
        if self.parts.is_none() || !TimerAlarm::is_available() {
            return Err(DisplayError::ResourceExhausted);
        }
        let alarm = TimerAlarm::take().ok_or(DisplayError::ResourceExhausted)?;
        let parts = self.parts.take().ok_or(DisplayError::ResourceExhausted)?;

        // Chip select low before the clock and data lines come alive
        let select = SelectPin::new(parts.select);

        let driver = Spi::new_blocking_txonly(
            parts.spi,
            parts.clock,
            parts.data,
            spi_block::driver_config(spi),
        );
        let transfer = DmaFrameTransfer::new(parts.dma, driver, block);

        Ok(Hardware {
            select,
            transfer,
            alarm,
        })
    }
}
