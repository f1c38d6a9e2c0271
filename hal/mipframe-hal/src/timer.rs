//! One-shot alarm abstraction
//!
//! The panel needs chip select held low for a minimum time between
//! frames. A hardware alarm provides that gap without busy waiting.

/// Hardware one-shot alarm
///
/// Arming from interrupt context must be safe. When the alarm fires the
/// firmware's interrupt handler calls back into the scheduler.
pub trait OneShotAlarm {
    /// Fire once, `after_us` microseconds from now
    ///
    /// Re-arming replaces any pending expiry.
    fn arm(&mut self, after_us: u32);

    /// Clear the fired condition
    fn acknowledge(&mut self) {}
}
