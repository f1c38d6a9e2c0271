//! Error type shared by every foreground operation

use core::fmt;

/// Errors returned by [`Display`](crate::Display) operations
///
/// Every error is reported synchronously to the caller and leaves the
/// role table and frame contents exactly as they were before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Unsupported bus id or unusable pin selection
    InvalidConfig,
    /// `init` called again with different bus/pin parameters
    Reinitialization,
    /// No DMA channel (or frame pool) left to claim
    ResourceExhausted,
    /// Operation attempted before `init`
    NotInitialized,
    /// Tile or destination region outside the panel cell grid
    OutOfBounds,
    /// Tile byte count does not match its dimensions
    InvalidBuffer,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            DisplayError::InvalidConfig => "unsupported bus or pin selection",
            DisplayError::Reinitialization => "reinitialization with different parameters",
            DisplayError::ResourceExhausted => "could not claim DMA channel",
            DisplayError::NotInitialized => "display was not initialized",
            DisplayError::OutOfBounds => "region out of bounds",
            DisplayError::InvalidBuffer => "tile buffer length invalid",
        };
        f.write_str(msg)
    }
}
