//! mipframe - memory-in-pixel display firmware
//!
//! Keeps a 400x240 MIP panel refreshed from three frame buffers. The
//! refresh loop runs entirely in interrupt context (DMA completion and a
//! TIMER alarm); the executor only runs the application that draws and
//! publishes frames.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use {defmt_rtt as _, panic_probe as _};

use mipframe_core::{Display, FramePool, Geometry, RefreshSlot, SchedulerFor, FRAME_LEN};
use mipframe_hal_rp2040::Rp2040Bus;

mod config;
mod tasks;

pub type PanelMutex = CriticalSectionRawMutex;
pub type PanelDisplay = Display<'static, PanelMutex, FRAME_LEN>;
type PanelBus = Rp2040Bus<config::PanelSpi, config::PanelClock, config::PanelData>;
type PanelScheduler = SchedulerFor<'static, PanelMutex, FRAME_LEN, PanelBus>;

/// The three frame buffers, about 37 KiB of RAM
static POOL: FramePool<PanelMutex, FRAME_LEN> = FramePool::new(Geometry::REFERENCE);

/// Scheduler reached from the interrupt handlers below
pub static REFRESH: RefreshSlot<PanelMutex, PanelScheduler> = RefreshSlot::new();

#[interrupt]
fn DMA_IRQ_1() {
    REFRESH.on_transfer_complete();
}

#[interrupt]
fn TIMER_IRQ_1() {
    REFRESH.on_alarm();
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("mipframe firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // SPI block, pins and DMA channel from panel.toml
    let mut bus: PanelBus = Rp2040Bus::new(
        config::panel_peripherals(p),
        embassy_rp::clocks::clk_peri_freq(),
    );

    // Both refresh interrupts share a priority so neither preempts the other
    for irq in [interrupt::DMA_IRQ_1, interrupt::TIMER_IRQ_1] {
        irq.set_priority(Priority::P1);
        irq.unpend();
    }

    let mut display = Display::new(&POOL, config::TIMING);
    match display.init(config::BUS, &mut bus, &REFRESH) {
        Ok(()) => {
            // SAFETY: the handlers only touch REFRESH, which is now installed
            unsafe {
                interrupt::DMA_IRQ_1.enable();
                interrupt::TIMER_IRQ_1.enable();
            }
            info!(
                "Display refreshing on SPI{} (sck={}, tx={}, cs={}), {} Hz",
                config::BUS.bus_id,
                config::BUS.clock_pin,
                config::BUS.data_pin,
                config::BUS.select_pin,
                config::TIMING.spi_frequency_hz
            );
        }
        Err(e) => {
            error!("Display init failed: {}", e);
            loop {
                embassy_time::Timer::after_secs(60).await;
            }
        }
    }

    spawner.spawn(tasks::demo_task(display)).unwrap();
    spawner.spawn(tasks::heartbeat_task()).unwrap();

    info!("All tasks spawned, firmware running");
}
