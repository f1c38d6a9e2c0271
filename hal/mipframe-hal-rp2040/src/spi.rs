//! SPI block setup for DMA-fed transmission
//!
//! Clocking, framing and pin muxing come from embassy-rp's blocking
//! transmit-only driver. What it does not cover is pacing a DMA channel
//! from the transmit FIFO, so the TX DMA request and the data register
//! address are handled here.

use embassy_rp::pac;
use embassy_rp::pac::dma::vals::TreqSel;
use embassy_rp::spi;
use mipframe_hal::spi::{Phase, Polarity};
use mipframe_hal::SpiConfig;

/// Number of SPI blocks on RP2040
pub const SPI_COUNT: u8 = 2;

/// Largest combined divider (prescale 254, serial clock rate 256)
const MAX_DIVIDER: u32 = 254 * 256;

/// One of the two SPI blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiBlock(u8);

impl SpiBlock {
    pub fn new(index: u8) -> Option<Self> {
        (index < SPI_COUNT).then_some(Self(index))
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    fn regs(&self) -> pac::spi::Spi {
        match self.0 {
            0 => pac::SPI0,
            _ => pac::SPI1,
        }
    }

    /// DMA request line paced by this block's TX FIFO
    pub fn tx_dreq(&self) -> TreqSel {
        match self.0 {
            0 => TreqSel::SPI0_TX,
            _ => TreqSel::SPI1_TX,
        }
    }

    /// Address of the data register, the DMA write target
    pub fn data_register(&self) -> u32 {
        self.regs().dr().as_ptr() as u32
    }

    /// Let the TX FIFO raise DMA requests
    pub fn enable_tx_dma(&self) {
        self.regs().dmacr().write(|w| {
            w.set_txdmae(true);
            w.set_rxdmae(false);
        });
    }
}

/// Whether `hz` can be produced from `clk_peri_hz`
///
/// The block divides the peripheral clock by at least 2 and at most
/// 254 * 256.
pub fn frequency_supported(hz: u32, clk_peri_hz: u32) -> bool {
    hz != 0 && hz <= clk_peri_hz / 2 && hz >= clk_peri_hz.div_ceil(MAX_DIVIDER)
}

/// embassy-rp driver configuration for `config`
pub fn driver_config(config: &SpiConfig) -> spi::Config {
    let mut out = spi::Config::default();
    out.frequency = config.frequency;
    out.polarity = match config.polarity {
        Polarity::IdleLow => spi::Polarity::IdleLow,
        Polarity::IdleHigh => spi::Polarity::IdleHigh,
    };
    out.phase = match config.phase {
        Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
        Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
    };
    out
}
