//! Refresh cycle state machine
//!
//! ```text
//!            AlarmFired              TransferComplete
//!   Idle ───────────────▶ Transmitting ───────────────▶ Settling
//!                              ▲                           │
//!                              └────────── AlarmFired ─────┘
//! ```
//!
//! `Idle` only exists before the bootstrap cycle; afterwards the machine
//! alternates between `Transmitting` and `Settling` forever. `Settling`
//! is also the between-cycles wait: chip select is released and the
//! settle alarm is armed, and the alarm expiring is what starts the next
//! cycle. A separate idle phase after settling would have no event to
//! leave it by.

/// Refresh cycle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// No transfer started yet, chip select deasserted
    Idle,
    /// Chip select asserted, DMA streaming the consumer frame
    Transmitting,
    /// Chip select deasserted, settle alarm armed until the next cycle
    Settling,
}

/// Hardware events feeding the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Settle alarm expired (or bootstrap from init)
    AlarmFired,
    /// DMA signalled the end of the frame
    TransferComplete,
}

impl Phase {
    /// Whether chip select is held active in this phase
    pub fn chip_select_active(&self) -> bool {
        matches!(self, Phase::Transmitting)
    }

    /// Process an event and return the next phase
    ///
    /// Events that make no sense in the current phase (a stray alarm
    /// during a transfer, a duplicate completion) leave it unchanged.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use Phase::*;

        match (self, event) {
            (Idle, AlarmFired) => Transmitting,
            (Settling, AlarmFired) => Transmitting,
            (Transmitting, TransferComplete) => Settling,

            // Default: stay in current phase
            _ => self,
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle
    }
}
