//! Board-agnostic core of the memory-in-pixel refresh engine
//!
//! This crate contains everything that does not depend on a specific chip:
//!
//! - Panel geometry and refresh timing configuration
//! - Device-native frame layout (row addresses, polarity byte)
//! - Triple-buffer frame pool with producer/consumer/idle roles
//! - Tile blitter writing pre-packed bitmaps into the producer frame
//! - Transmission scheduler state machine (interrupt side)
//! - Foreground `Display` facade (init, blit, publish)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod blit;
pub mod config;
pub mod display;
pub mod error;
pub mod frame;
pub mod scheduler;
pub mod traits;

pub use blit::{Region, Tile};
pub use config::{Geometry, PanelConfig, Timing, FRAME_LEN};
pub use display::{Display, SchedulerFor};
pub use error::DisplayError;
pub use frame::{Consumer, FramePool, Producer, RoleTable};
pub use scheduler::{RefreshSlot, Scheduler};
pub use traits::{Bus, BusParams, Hardware};
