//! Tile blitter
//!
//! Copies a caller-supplied bitmap tile into a frame at cell coordinates.
//! A cell is one data byte wide and 8 device rows tall. Tiles smaller
//! than the destination region repeat in both directions.
//!
//! Bytes are copied verbatim: the caller packs pixels into the panel's
//! native byte order beforehand.

use crate::config::{Geometry, LINES_PER_CELL};
use crate::error::DisplayError;
use crate::frame::layout;

const LINES: usize = LINES_PER_CELL as usize;

/// Pre-packed source bitmap, `width` x `height` cells
///
/// Bytes are row-major over device lines: line `l` of cell row `cy`
/// starts at `(cy * 8 + l) * width`.
#[derive(Debug, Clone, Copy)]
pub struct Tile<'a> {
    bytes: &'a [u8],
    width: u16,
    height: u16,
}

impl<'a> Tile<'a> {
    /// Wrap tile bytes, checking them against the dimensions
    pub fn new(bytes: &'a [u8], width: u16, height: u16) -> Result<Self, DisplayError> {
        if width == 0 || height == 0 {
            return Err(DisplayError::OutOfBounds);
        }
        if bytes.len() != width as usize * height as usize * LINES {
            return Err(DisplayError::InvalidBuffer);
        }
        Ok(Self {
            bytes,
            width,
            height,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// One device line of tile cell row `cell_row`
    fn line(&self, cell_row: usize, line: usize) -> &'a [u8] {
        let width = self.width as usize;
        let start = (cell_row * LINES + line) * width;
        &self.bytes[start..start + width]
    }
}

/// Destination rectangle in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check the region is non-empty and inside the cell grid
    pub fn check(&self, geometry: &Geometry) -> Result<(), DisplayError> {
        if self.width == 0 || self.height == 0 {
            return Err(DisplayError::OutOfBounds);
        }

        let last_x = self.x as u32 + self.width as u32 - 1;
        let last_y = self.y as u32 + self.height as u32 - 1;
        if last_x >= geometry.columns() as u32 || last_y >= geometry.cell_rows() as u32 {
            return Err(DisplayError::OutOfBounds);
        }

        Ok(())
    }
}

/// Copy `tile` into `frame`, repeating it across `region`
///
/// Nothing is written unless the region fits the grid.
pub fn blit(
    frame: &mut [u8],
    geometry: &Geometry,
    tile: &Tile<'_>,
    region: &Region,
) -> Result<(), DisplayError> {
    region.check(geometry)?;
    debug_assert_eq!(frame.len(), geometry.frame_len());

    let width = region.width as usize;
    let tile_rows = tile.height as usize;

    for (band, y) in (region.y as usize..(region.y + region.height) as usize).enumerate() {
        let src_row = band % tile_rows;
        for line in 0..LINES {
            let start = layout::data_offset(geometry, y * LINES + line, region.x as usize);
            let dst = &mut frame[start..start + width];
            // Source column restarts on every line and wraps at the tile edge
            for (d, s) in dst.iter_mut().zip(tile.line(src_row, line).iter().cycle()) {
                *d = *s;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FRAME_LEN;
    use proptest::prelude::*;

    fn blank_frame() -> [u8; FRAME_LEN] {
        let mut frame = [0u8; FRAME_LEN];
        layout::write_skeleton(&mut frame, &Geometry::REFERENCE);
        frame
    }

    fn cell(frame: &[u8], x: usize, y: usize) -> [u8; 8] {
        let g = Geometry::REFERENCE;
        let mut out = [0u8; 8];
        for (line, b) in out.iter_mut().enumerate() {
            *b = frame[layout::data_offset(&g, y * 8 + line, x)];
        }
        out
    }

    #[test]
    fn test_single_cell() {
        let g = Geometry::REFERENCE;
        let mut frame = blank_frame();
        let bytes = [1, 2, 3, 4, 5, 6, 7, 8];
        let tile = Tile::new(&bytes, 1, 1).unwrap();

        blit(&mut frame, &g, &tile, &Region::new(3, 2, 1, 1)).unwrap();
        assert_eq!(cell(&frame, 3, 2), bytes);
        assert_eq!(cell(&frame, 4, 2), [0; 8]);
    }

    #[test]
    fn test_one_cell_tile_fills_region() {
        let g = Geometry::REFERENCE;
        let mut frame = blank_frame();
        let bytes = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];
        let tile = Tile::new(&bytes, 1, 1).unwrap();

        blit(&mut frame, &g, &tile, &Region::new(0, 0, 2, 2)).unwrap();
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(cell(&frame, x, y), bytes);
        }
    }

    #[test]
    fn test_tile_wraps_horizontally() {
        let g = Geometry::REFERENCE;
        let mut frame = blank_frame();
        // 2x1 tile: left column 0xAA, right column 0x55
        let mut bytes = [0u8; 16];
        for line in 0..8 {
            bytes[line * 2] = 0xAA;
            bytes[line * 2 + 1] = 0x55;
        }
        let tile = Tile::new(&bytes, 2, 1).unwrap();

        blit(&mut frame, &g, &tile, &Region::new(10, 0, 5, 1)).unwrap();
        assert_eq!(cell(&frame, 10, 0), [0xAA; 8]);
        assert_eq!(cell(&frame, 11, 0), [0x55; 8]);
        assert_eq!(cell(&frame, 12, 0), [0xAA; 8]);
        assert_eq!(cell(&frame, 13, 0), [0x55; 8]);
        assert_eq!(cell(&frame, 14, 0), [0xAA; 8]);
    }

    #[test]
    fn test_tile_wraps_vertically() {
        let g = Geometry::REFERENCE;
        let mut frame = blank_frame();
        // 1x2 tile: top cell 0x0F, bottom cell 0xF0
        let mut bytes = [0x0Fu8; 16];
        bytes[8..].fill(0xF0);
        let tile = Tile::new(&bytes, 1, 2).unwrap();

        blit(&mut frame, &g, &tile, &Region::new(0, 27, 1, 3)).unwrap();
        assert_eq!(cell(&frame, 0, 27), [0x0F; 8]);
        assert_eq!(cell(&frame, 0, 28), [0xF0; 8]);
        assert_eq!(cell(&frame, 0, 29), [0x0F; 8]);
    }

    #[test]
    fn test_skeleton_untouched() {
        let g = Geometry::REFERENCE;
        let mut frame = blank_frame();
        let bytes = [0xFFu8; 50 * 30 * 8];
        let tile = Tile::new(&bytes, 50, 30).unwrap();

        blit(&mut frame, &g, &tile, &Region::new(0, 0, 50, 30)).unwrap();

        let skeleton = blank_frame();
        for row in 0..240 {
            let start = layout::row_offset(&g, row);
            assert_eq!(frame[start], skeleton[start]);
            assert_eq!(frame[start + 51], 0);
            assert!(frame[start + 1..start + 51].iter().all(|&b| b == 0xFF));
        }
        assert_eq!(frame[0], skeleton[0]);
        assert_eq!(frame[FRAME_LEN - 1], 0);
    }

    #[test]
    fn test_region_out_of_bounds() {
        let g = Geometry::REFERENCE;
        // 49 + 2 - 1 = 50 > 49
        assert_eq!(Region::new(49, 0, 2, 1).check(&g), Err(DisplayError::OutOfBounds));
        assert_eq!(Region::new(0, 29, 1, 2).check(&g), Err(DisplayError::OutOfBounds));
        assert_eq!(Region::new(0, 0, 0, 1).check(&g), Err(DisplayError::OutOfBounds));
        assert_eq!(Region::new(0, 0, 1, 0).check(&g), Err(DisplayError::OutOfBounds));
        assert_eq!(
            Region::new(u16::MAX, u16::MAX, u16::MAX, u16::MAX).check(&g),
            Err(DisplayError::OutOfBounds)
        );
        assert_eq!(Region::new(49, 29, 1, 1).check(&g), Ok(()));
        assert_eq!(Region::new(0, 0, 50, 30).check(&g), Ok(()));
    }

    #[test]
    fn test_tile_validation() {
        let bytes = [0u8; 16];
        assert_eq!(Tile::new(&bytes, 0, 1).err(), Some(DisplayError::OutOfBounds));
        assert_eq!(Tile::new(&bytes, 1, 0).err(), Some(DisplayError::OutOfBounds));
        assert_eq!(Tile::new(&bytes, 1, 1).err(), Some(DisplayError::InvalidBuffer));
        assert_eq!(Tile::new(&bytes[..15], 2, 1).err(), Some(DisplayError::InvalidBuffer));
        assert!(Tile::new(&bytes, 2, 1).is_ok());
        assert!(Tile::new(&bytes, 1, 2).is_ok());
    }

    #[test]
    fn test_rejected_blit_writes_nothing() {
        let g = Geometry::REFERENCE;
        let mut frame = blank_frame();
        let bytes = [0xFFu8; 8];
        let tile = Tile::new(&bytes, 1, 1).unwrap();

        let result = blit(&mut frame, &g, &tile, &Region::new(49, 0, 2, 1));
        assert_eq!(result, Err(DisplayError::OutOfBounds));
        assert_eq!(frame, blank_frame());
    }

    proptest! {
        #[test]
        fn prop_blit_tiles_and_stays_inside(
            tw in 1u16..4,
            th in 1u16..4,
            x in 0u16..50,
            y in 0u16..30,
            w in 1u16..8,
            h in 1u16..5,
            seed in any::<u8>(),
        ) {
            prop_assume!(x + w <= 50 && y + h <= 30);

            let g = Geometry::REFERENCE;
            let len = tw as usize * th as usize * 8;
            let bytes: std::vec::Vec<u8> = (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect();
            let tile = Tile::new(&bytes, tw, th).unwrap();

            let mut frame = blank_frame();
            blit(&mut frame, &g, &tile, &Region::new(x, y, w, h)).unwrap();

            let skeleton = blank_frame();
            for cy in 0..30usize {
                for line in 0..8usize {
                    for cx in 0..50usize {
                        let at = layout::data_offset(&g, cy * 8 + line, cx);
                        let inside = (x as usize..(x + w) as usize).contains(&cx)
                            && (y as usize..(y + h) as usize).contains(&cy);
                        if inside {
                            let sx = (cx - x as usize) % tw as usize;
                            let sy = (cy - y as usize) % th as usize;
                            let src = bytes[(sy * 8 + line) * tw as usize + sx];
                            prop_assert_eq!(frame[at], src);
                        } else {
                            prop_assert_eq!(frame[at], skeleton[at]);
                        }
                    }
                }
            }
        }
    }
}
