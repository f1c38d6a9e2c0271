//! mipframe Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the refresh engine is written
//! against. Chip-specific HALs implement them; the board-agnostic core
//! never touches a register.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  mipframe-firmware (board bring-up)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  mipframe-core (pool, blit, scheduler)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  mipframe-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  mipframe-hal-rp2040                    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Chip select / frame start line
//! - [`dma::FrameTransfer`] - DMA stream of one frame into the serial bus
//! - [`timer::OneShotAlarm`] - Settle delay between transfers
//! - [`spi::SpiConfig`] - Serial bus clocking

#![no_std]
#![deny(unsafe_code)]

pub mod dma;
pub mod gpio;
pub mod spi;
pub mod timer;

// Re-export key traits at crate root for convenience
pub use dma::FrameTransfer;
pub use gpio::OutputPin;
pub use spi::SpiConfig;
pub use timer::OneShotAlarm;
