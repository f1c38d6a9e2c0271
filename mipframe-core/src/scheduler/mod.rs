//! Transmission scheduler
//!
//! Runs entirely in interrupt context. Two hardware events drive it:
//! the settle alarm firing and the DMA transfer completing. Each cycle
//! adopts any newly published frame, flips the polarity bit and streams
//! the consumer frame to the panel. The loop never terminates.

pub mod engine;
pub mod phase;
pub mod slot;

pub use engine::{RefreshStats, Scheduler};
pub use phase::{Event, Phase};
pub use slot::{RefreshEngine, RefreshSlot};
