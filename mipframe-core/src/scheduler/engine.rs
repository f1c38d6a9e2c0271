//! Refresh engine
//!
//! Owns the consumer side of the frame pool and the three pieces of
//! hardware the refresh loop needs. Every entry point is interrupt-safe:
//! no allocation, no blocking beyond the short role lock.

use embassy_sync::blocking_mutex::raw::RawMutex;
use mipframe_hal::gpio::ChipSelect;
use mipframe_hal::{FrameTransfer, OneShotAlarm, OutputPin};

use super::phase::{Event, Phase};
use super::slot::RefreshEngine;
use crate::config::Timing;
use crate::frame::{Consumer, Vcom};
use crate::traits::Hardware;

/// Counters for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshStats {
    /// Transfers started
    pub cycles: u32,
    /// Cycles that picked up a newly published frame
    pub frames_adopted: u32,
}

/// Transmission scheduler
pub struct Scheduler<'a, M: RawMutex, const N: usize, CS, TX, AL> {
    consumer: Consumer<'a, M, N>,
    cs: ChipSelect<CS>,
    transfer: TX,
    alarm: AL,
    settle_us: u32,
    phase: Phase,
    vcom: Vcom,
    stats: RefreshStats,
}

impl<'a, M, const N: usize, CS, TX, AL> Scheduler<'a, M, N, CS, TX, AL>
where
    M: RawMutex,
    CS: OutputPin,
    TX: FrameTransfer,
    AL: OneShotAlarm,
{
    /// Create an idle scheduler; nothing is transmitted until the first
    /// [`Event::AlarmFired`]
    pub fn new(consumer: Consumer<'a, M, N>, hardware: Hardware<CS, TX, AL>, timing: &Timing) -> Self {
        Self {
            consumer,
            cs: ChipSelect::active_high(hardware.select),
            transfer: hardware.transfer,
            alarm: hardware.alarm,
            settle_us: timing.settle_us,
            phase: Phase::Idle,
            vcom: Vcom::High,
            stats: RefreshStats::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Polarity the next transfer will carry
    pub fn next_polarity(&self) -> Vcom {
        self.vcom
    }

    pub fn stats(&self) -> RefreshStats {
        self.stats
    }

    /// Slot the engine transmits from
    pub fn consumer_slot(&self) -> usize {
        self.consumer.slot()
    }

    pub fn transfer(&self) -> &TX {
        &self.transfer
    }

    pub fn alarm(&self) -> &AL {
        &self.alarm
    }

    /// Feed one hardware event through the state machine
    ///
    /// An event the current phase does not expect only clears its
    /// hardware condition, so a spurious interrupt cannot re-fire.
    pub fn handle(&mut self, event: Event) {
        let next = self.phase.transition(event);
        if next == self.phase {
            match event {
                Event::AlarmFired => self.alarm.acknowledge(),
                Event::TransferComplete => self.transfer.acknowledge(),
            }
            return;
        }

        match event {
            Event::AlarmFired => self.start_cycle(),
            Event::TransferComplete => self.finish_transfer(),
        }
        self.phase = next;
    }

    /// Cycle advance: adopt, stamp polarity, assert CS, start DMA
    fn start_cycle(&mut self) {
        self.alarm.acknowledge();

        // The only point where a published frame becomes visible here
        if self.consumer.adopt() {
            self.stats.frames_adopted = self.stats.frames_adopted.wrapping_add(1);
        }

        self.consumer.stamp(self.vcom.command_byte());
        self.vcom = self.vcom.toggled();

        self.cs.assert();
        self.transfer.start(self.consumer.frame());
        self.stats.cycles = self.stats.cycles.wrapping_add(1);
    }

    /// Transfer complete: release CS, clear the IRQ, arm the settle alarm
    fn finish_transfer(&mut self) {
        self.cs.deassert();
        self.transfer.acknowledge();
        self.alarm.arm(self.settle_us);
    }
}

impl<'a, M, const N: usize, CS, TX, AL> RefreshEngine for Scheduler<'a, M, N, CS, TX, AL>
where
    M: RawMutex,
    CS: OutputPin,
    TX: FrameTransfer,
    AL: OneShotAlarm,
{
    fn handle(&mut self, event: Event) {
        Scheduler::handle(self, event)
    }
}
