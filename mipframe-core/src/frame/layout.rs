//! Device-native frame layout
//!
//! ```text
//! ┌──────┬───────────────────────────────────────────┬─────────┐
//! │ CMD  │ ROW 1 .. ROW R                            │ TRAILER │
//! │ 1B   │ R x (ADDR 1B │ DATA D B │ PAD 1B)        │ 1B      │
//! └──────┴───────────────────────────────────────────┴─────────┘
//! ```
//!
//! CMD is the write command with the current polarity (VCOM) bit. ADDR is
//! the 1-based row number, bit-reversed because the panel shifts the
//! address in LSB first. DATA bytes pass through untouched.

use crate::config::Geometry;

/// Write-line command bit, always set in byte 0
pub const CMD_WRITE: u8 = 0x80;

/// Polarity (VCOM) bit in byte 0
pub const VCOM_BIT: u8 = 0x40;

/// Polarity state carried in the command byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Vcom {
    High,
    Low,
}

impl Vcom {
    /// Encoded command byte for this polarity
    pub const fn command_byte(self) -> u8 {
        match self {
            Vcom::High => CMD_WRITE | VCOM_BIT,
            Vcom::Low => CMD_WRITE,
        }
    }

    /// The other polarity
    pub const fn toggled(self) -> Self {
        match self {
            Vcom::High => Vcom::Low,
            Vcom::Low => Vcom::High,
        }
    }
}

/// Reverse the bit order of a byte
pub const fn reverse_bits(mut x: u8) -> u8 {
    let mut y = 0u8;
    let mut i = 0;
    while i < 8 {
        y = (y << 1) | (x & 1);
        x >>= 1;
        i += 1;
    }
    y
}

/// Address byte for a 0-based device row
pub const fn row_address(row: u16) -> u8 {
    reverse_bits((row + 1) as u8)
}

/// Offset of a row's address byte
pub const fn row_offset(geometry: &Geometry, row: usize) -> usize {
    1 + row * geometry.row_stride()
}

/// Offset of data byte `column` in device row `row`
pub const fn data_offset(geometry: &Geometry, row: usize, column: usize) -> usize {
    row_offset(geometry, row) + 1 + column
}

/// Fill `frame` with the fixed addressing skeleton and a blank pixel area
///
/// `frame` must be exactly `geometry.frame_len()` bytes.
pub fn write_skeleton(frame: &mut [u8], geometry: &Geometry) {
    debug_assert_eq!(frame.len(), geometry.frame_len());

    frame.fill(geometry.blank);
    frame[0] = Vcom::High.command_byte();

    let row_bytes = geometry.row_bytes as usize;
    for row in 0..geometry.rows {
        let start = row_offset(geometry, row as usize);
        frame[start] = row_address(row);
        frame[start + 1 + row_bytes] = 0;
    }

    let last = frame.len() - 1;
    frame[last] = 0;
}
