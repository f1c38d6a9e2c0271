//! Host fakes for the hardware traits
#![allow(dead_code)]

use std::vec::Vec;

use mipframe_core::{Bus, BusParams, DisplayError, Hardware};
use mipframe_hal::{FrameTransfer, OneShotAlarm, OutputPin, SpiConfig};

#[derive(Default)]
pub struct FakePin {
    pub high: bool,
    pub edges: usize,
}

impl OutputPin for FakePin {
    fn set_high(&mut self) {
        if !self.high {
            self.edges += 1;
        }
        self.high = true;
    }

    fn set_low(&mut self) {
        if self.high {
            self.edges += 1;
        }
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Keeps a full copy of every frame handed to the transfer
#[derive(Default)]
pub struct RecordingTransfer {
    pub frames: Vec<Vec<u8>>,
    pub busy: bool,
    pub acks: usize,
}

impl FrameTransfer for RecordingTransfer {
    fn start(&mut self, frame: &[u8]) {
        self.frames.push(frame.to_vec());
        self.busy = true;
    }

    fn acknowledge(&mut self) {
        self.busy = false;
        self.acks += 1;
    }

    fn is_busy(&self) -> bool {
        self.busy
    }
}

#[derive(Default)]
pub struct FakeAlarm {
    pub armed: Vec<u32>,
    pub acks: usize,
}

impl OneShotAlarm for FakeAlarm {
    fn arm(&mut self, after_us: u32) {
        self.armed.push(after_us);
    }

    fn acknowledge(&mut self) {
        self.acks += 1;
    }
}

/// Board with two serial buses, 30 pins and `channels` free DMA channels
pub struct FakeBus {
    pub channels: u8,
    pub last_spi: Option<SpiConfig>,
}

impl FakeBus {
    pub fn new(channels: u8) -> Self {
        Self {
            channels,
            last_spi: None,
        }
    }
}

impl Bus for FakeBus {
    type Select = FakePin;
    type Transfer = RecordingTransfer;
    type Alarm = FakeAlarm;

    fn supports(&self, bus_id: u8) -> bool {
        bus_id < 2
    }

    fn validate(&self, params: &BusParams) -> Result<(), DisplayError> {
        if !self.supports(params.bus_id)
            || !params.pins_distinct()
            || params.pins().iter().any(|&pin| pin >= 30)
        {
            return Err(DisplayError::InvalidConfig);
        }
        Ok(())
    }

    fn claim(
        &mut self,
        _params: &BusParams,
        spi: &SpiConfig,
    ) -> Result<Hardware<FakePin, RecordingTransfer, FakeAlarm>, DisplayError> {
        if self.channels == 0 {
            return Err(DisplayError::ResourceExhausted);
        }
        self.channels -= 1;
        self.last_spi = Some(*spi);
        Ok(Hardware {
            select: FakePin::default(),
            transfer: RecordingTransfer::default(),
            alarm: FakeAlarm::default(),
        })
    }
}

/// Reference frame built straight from the panel's wire format
pub fn expected_blank_frame(command: u8) -> Vec<u8> {
    let mut frame = Vec::with_capacity(12482);
    frame.push(command);
    for row in 1..=240u32 {
        frame.push((row as u8).reverse_bits());
        frame.extend(core::iter::repeat(0x00).take(50));
        frame.push(0x00);
    }
    frame.push(0x00);
    frame
}
