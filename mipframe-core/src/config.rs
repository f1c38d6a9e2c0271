//! Panel geometry and refresh timing
//!
//! The values here are properties of one panel family (400x240 Sharp
//! memory LCDs). They are configuration rather than magic numbers, but
//! the reference values must be kept for that family to work.

use mipframe_hal::spi::{Mode, SpiConfig};

/// Device rows stacked into one addressing cell
pub const LINES_PER_CELL: u16 = 8;

/// Frame length of the reference panel in bytes
pub const FRAME_LEN: usize = Geometry::REFERENCE.frame_len();

/// Panel geometry in device units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    /// Number of device rows (each gets an address byte)
    pub rows: u16,
    /// Packed pixel bytes per row (8 pixels per byte)
    pub row_bytes: u16,
    /// Pixel byte written into every data position at init
    pub blank: u8,
}

impl Geometry {
    /// 400x240 reference panel: 240 rows of 50 data bytes
    pub const REFERENCE: Self = Self {
        rows: 240,
        row_bytes: 50,
        blank: 0x00,
    };

    /// Row addresses are a single byte and cells are 8 rows tall
    pub const fn is_valid(&self) -> bool {
        self.rows > 0
            && self.rows <= 255
            && self.rows % LINES_PER_CELL == 0
            && self.row_bytes > 0
    }

    /// Cell grid height (row bands of 8 device rows)
    pub const fn cell_rows(&self) -> u16 {
        self.rows / LINES_PER_CELL
    }

    /// Cell grid width (one cell is one data byte wide)
    pub const fn columns(&self) -> u16 {
        self.row_bytes
    }

    /// Bytes per transmitted row: address + data + pad
    pub const fn row_stride(&self) -> usize {
        self.row_bytes as usize + 2
    }

    /// Total frame length: polarity byte + rows + trailer
    pub const fn frame_len(&self) -> usize {
        1 + self.rows as usize * self.row_stride() + 1
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Refresh timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Serial clock in Hz
    pub spi_frequency_hz: u32,
    /// Chip select low time between transfers in microseconds
    pub settle_us: u32,
}

impl Timing {
    /// 2 MHz bus, 200 µs settle (2x the shortest gap measured to work)
    pub const REFERENCE: Self = Self {
        spi_frequency_hz: 2_000_000,
        settle_us: 200,
    };

    /// Bus configuration for this timing (panel samples on the rising edge)
    pub fn spi_config(&self) -> SpiConfig {
        SpiConfig::new(self.spi_frequency_hz, Mode::Mode0)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Complete panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    pub geometry: Geometry,
    pub timing: Timing,
}

impl PanelConfig {
    /// Reference panel with reference timing
    pub const REFERENCE: Self = Self {
        geometry: Geometry::REFERENCE,
        timing: Timing::REFERENCE,
    };
}
