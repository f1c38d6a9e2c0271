//! Board configuration generated from panel.toml by build.rs

use mipframe_core::{BusParams, Timing};

include!(concat!(env!("OUT_DIR"), "/panel_config.rs"));

pub const BUS: BusParams = BusParams::new(BUS_ID, CLOCK_PIN, DATA_PIN, SELECT_PIN);

pub const TIMING: Timing = Timing {
    spi_frequency_hz: SPI_FREQUENCY_HZ,
    settle_us: SETTLE_US,
};
