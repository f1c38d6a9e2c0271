//! Demo application: a block bouncing over a checkerboard
//!
//! Each step redraws the whole background, draws the block at its new
//! position and publishes. Frames that are published faster than the
//! panel refreshes are simply superseded.

use defmt::*;
use embassy_time::{Duration, Ticker};
use mipframe_core::{DisplayError, Region};

use crate::PanelDisplay;

/// Time between published frames
pub const FRAME_INTERVAL_MS: u64 = 100;

/// One cell of alternating pixels, shifted every line
const CHECKER: [u8; 8] = [0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55];

/// Solid 2x2-cell block (16x16 pixels)
const BLOCK: [u8; 32] = [0xFF; 32];
const BLOCK_CELLS: u16 = 2;

/// Bouncing position along one axis
struct Axis {
    pos: u16,
    max: u16,
    forward: bool,
}

impl Axis {
    fn new(max: u16) -> Self {
        Self {
            pos: 0,
            max,
            forward: true,
        }
    }

    fn step(&mut self) {
        if self.max == 0 {
            return;
        }
        if self.forward && self.pos == self.max {
            self.forward = false;
        } else if !self.forward && self.pos == 0 {
            self.forward = true;
        }
        if self.forward {
            self.pos += 1;
        } else {
            self.pos -= 1;
        }
    }
}

fn draw(display: &mut PanelDisplay, x: u16, y: u16) -> Result<(), DisplayError> {
    let g = *display.geometry();
    display.blit(&CHECKER, 1, 1, Region::new(0, 0, g.columns(), g.cell_rows()))?;
    display.blit(&BLOCK, BLOCK_CELLS, BLOCK_CELLS, Region::new(x, y, BLOCK_CELLS, BLOCK_CELLS))?;
    display.publish()
}

#[embassy_executor::task]
pub async fn demo_task(mut display: PanelDisplay) {
    info!("Demo task started");

    let g = *display.geometry();
    let mut x = Axis::new(g.columns() - BLOCK_CELLS);
    let mut y = Axis::new(g.cell_rows() - BLOCK_CELLS);
    let mut ticker = Ticker::every(Duration::from_millis(FRAME_INTERVAL_MS));

    loop {
        if let Err(e) = draw(&mut display, x.pos, y.pos) {
            warn!("Frame not drawn: {}", e);
        }
        x.step();
        y.step();
        ticker.next().await;
    }
}
