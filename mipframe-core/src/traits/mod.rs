//! Hardware-facing traits of the core
//!
//! The per-peripheral traits (pins, DMA, alarm) live in `mipframe-hal`.
//! This module adds the bring-up seam: how a board turns bus and pin
//! numbers into those peripherals.

pub mod bus;

pub use bus::{Bus, BusParams, Hardware};
