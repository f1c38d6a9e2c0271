//! Periodic refresh statistics

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::REFRESH;

/// Heartbeat interval in seconds
pub const HEARTBEAT_INTERVAL_S: u64 = 10;

#[embassy_executor::task]
pub async fn heartbeat_task() {
    let mut ticker = Ticker::every(Duration::from_secs(HEARTBEAT_INTERVAL_S));

    loop {
        ticker.next().await;

        match REFRESH.with(|scheduler| (scheduler.stats(), scheduler.phase())) {
            Some((stats, phase)) => trace!(
                "Refresh heartbeat: {} cycles, {} frames adopted, {}",
                stats.cycles,
                stats.frames_adopted,
                phase
            ),
            None => warn!("Refresh scheduler not running"),
        }
    }
}
