//! RP2040-specific HAL for the mipframe refresh engine
//!
//! This crate provides RP2040 implementations of the `mipframe-hal`
//! traits plus the board-side half of display bring-up:
//!
//! - SPI pin muxing rules
//! - chip select as an embassy-rp `Output`
//! - SPI clocking through embassy-rp's blocking driver, with the TX DMA
//!   request enabled on top
//! - whole-frame DMA streaming on an owned channel (completion on DMA_IRQ_1)
//! - TIMER ALARM1 one-shot for the settle delay (TIMER_IRQ_1)
//! - [`Rp2040Bus`], the `mipframe_core::Bus` implementation tying them together
//!
//! The interrupt handlers themselves live in the firmware, which owns the
//! static scheduler slot they dispatch to.

#![no_std]

pub mod alarm;
pub mod bus;
pub mod dma;
pub mod pins;
pub mod select;
pub mod spi;

pub use alarm::TimerAlarm;
pub use bus::{BusPeripherals, Rp2040Bus};
pub use dma::DmaFrameTransfer;
pub use select::SelectPin;
