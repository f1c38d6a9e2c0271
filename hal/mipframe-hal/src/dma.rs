//! DMA frame transfer abstraction
//!
//! One transfer streams one complete frame from memory into the serial
//! bus transmit register. Completion is signalled by an interrupt that
//! the firmware routes back into the scheduler.

/// Memory-to-peripheral DMA stream for whole frames
///
/// All methods are called from interrupt context and must not block or
/// allocate.
pub trait FrameTransfer {
    /// Start streaming `frame` to the bus
    ///
    /// The caller guarantees the bytes stay valid and unmodified until
    /// the completion interrupt has been acknowledged, even though the
    /// borrow ends when this call returns. Implementations program the
    /// hardware with the slice's address and length.
    fn start(&mut self, frame: &[u8]);

    /// Clear the completion condition that raised the interrupt
    fn acknowledge(&mut self);

    /// Whether a transfer is still in flight
    fn is_busy(&self) -> bool;
}
