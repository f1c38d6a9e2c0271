//! Whole-frame streaming on one DMA channel
//!
//! embassy-rp services DMA_IRQ_0 for its own drivers. Frame transfers
//! signal completion on DMA_IRQ_1 instead and are masked off IRQ_0, so
//! the two handlers never acknowledge each other's channels. The channel
//! is owned, which keeps every embassy driver away from it.

use core::sync::atomic::{compiler_fence, Ordering};

use embassy_rp::dma::{AnyChannel, Channel};
use embassy_rp::pac;
use embassy_rp::pac::dma::vals::{DataSize, TreqSel};
use embassy_rp::spi::{Blocking, Instance, Spi};
use embassy_rp::Peri;
use mipframe_hal::FrameTransfer;

use crate::spi::SpiBlock;

/// Interrupt line used for frame completion
const IRQ_LINE: usize = 1;

/// One DMA channel streaming frames into an SPI block's TX FIFO
pub struct DmaFrameTransfer<T: Instance + 'static> {
    channel: Peri<'static, AnyChannel>,
    _spi: Spi<'static, T, Blocking>,
    target: u32,
    dreq: TreqSel,
}

impl<T: Instance + 'static> DmaFrameTransfer<T> {
    /// Pace `channel` from the TX FIFO of `block`, which `spi` drives
    ///
    /// Routes the channel's completion to DMA_IRQ_1.
    pub fn new(
        channel: Peri<'static, AnyChannel>,
        spi: Spi<'static, T, Blocking>,
        block: SpiBlock,
    ) -> Self {
        block.enable_tx_dma();

        let bit = 1u32 << channel.number();
        pac::DMA.inte(0).modify(|w| *w &= !bit);
        pac::DMA.ints(IRQ_LINE).write_value(bit);
        pac::DMA.inte(IRQ_LINE).modify(|w| *w |= bit);

        Self {
            channel,
            _spi: spi,
            target: block.data_register(),
            dreq: block.tx_dreq(),
        }
    }

    fn regs(&self) -> pac::dma::Channel {
        pac::DMA.ch(self.channel.number() as usize)
    }
}

impl<T: Instance + 'static> FrameTransfer for DmaFrameTransfer<T> {
    fn start(&mut self, frame: &[u8]) {
        let ch = self.regs();
        ch.read_addr().write_value(frame.as_ptr() as u32);
        ch.write_addr().write_value(self.target);
        ch.trans_count().write_value(frame.len() as u32);

        // Frame bytes (including the freshly stamped command byte) must be
        // in memory before the channel starts reading them
        compiler_fence(Ordering::SeqCst);

        let number = self.channel.number();
        ch.ctrl_trig().write(|w| {
            w.set_treq_sel(self.dreq);
            w.set_data_size(DataSize::SIZE_BYTE);
            w.set_incr_read(true);
            w.set_incr_write(false);
            w.set_chain_to(number);
            w.set_en(true);
        });
    }

    fn acknowledge(&mut self) {
        pac::DMA.ints(IRQ_LINE).write_value(1 << self.channel.number());
    }

    fn is_busy(&self) -> bool {
        self.regs().ctrl_trig().read().busy()
    }
}
