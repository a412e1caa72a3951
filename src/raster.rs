//! Rasterization of a [`Grid`] into a two-color indexed bitmap.

use image::{ExtendedColorType, ImageEncoder, codecs::png::PngEncoder};

use crate::foundation::error::{GolError, GolResult};
use crate::grid::{DEAD, Grid};

/// Palette index of a dead cell (white).
pub const OFF_INDEX: u8 = 0;
/// Palette index of a live cell (black).
pub const ON_INDEX: u8 = 1;

/// Global RGB palette: index 0 = white, index 1 = black.
pub const PALETTE_BW: [u8; 6] = [0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00];

/// Largest accepted magnification factor (matches the serving layer's bound).
pub const MAX_MAGNIFICATION: u32 = 20;

/// A rendered frame as palette indices, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedBitmap {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// One palette index per pixel, `width * height` entries.
    pub pixels: Vec<u8>,
}

/// Validate a magnification factor.
pub fn check_magnification(mag: u32) -> GolResult<()> {
    if !(1..=MAX_MAGNIFICATION).contains(&mag) {
        return Err(GolError::validation(format!(
            "magnification must be in 1..={MAX_MAGNIFICATION}, got {mag}"
        )));
    }
    Ok(())
}

/// Rasterize `grid` at magnification `mag`.
///
/// Every cell becomes a solid `mag x mag` block, [`ON_INDEX`] for live and
/// [`OFF_INDEX`] for dead. The output is `(width*mag + 1, height*mag + 1)`
/// pixels; the one-pixel pad is part of the wire format downstream consumers
/// expect and must not be dropped.
pub fn rasterize(grid: &Grid, mag: u32) -> GolResult<IndexedBitmap> {
    check_magnification(mag)?;
    let mag = mag as usize;
    let out_w = grid.width() * mag + 1;
    let out_h = grid.height() * mag + 1;
    let mut pixels = vec![OFF_INDEX; out_w * out_h];

    for (i, &cell) in grid.cells().iter().enumerate() {
        if cell == DEAD {
            continue;
        }
        let x = (i % grid.width()) * mag;
        let y = (i / grid.width()) * mag;
        for row in y..y + mag {
            let start = row * out_w + x;
            pixels[start..start + mag].fill(ON_INDEX);
        }
    }

    Ok(IndexedBitmap {
        width: out_w as u32,
        height: out_h as u32,
        pixels,
    })
}

/// Encode an indexed bitmap as a grayscale PNG.
pub fn encode_png(bitmap: &IndexedBitmap) -> GolResult<Vec<u8>> {
    // Two-entry palette collapses to 8-bit gray: white background, black cells.
    let gray: Vec<u8> = bitmap
        .pixels
        .iter()
        .map(|&idx| if idx == OFF_INDEX { 0xFF } else { 0x00 })
        .collect();

    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(&gray, bitmap.width, bitmap.height, ExtendedColorType::L8)
        .map_err(|e| GolError::render(format!("png encode failed: {e}")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ALIVE;

    #[test]
    fn output_carries_one_pixel_pad() {
        let g = Grid::new(4, 3);
        let bmp = rasterize(&g, 2).unwrap();
        assert_eq!(bmp.width, 4 * 2 + 1);
        assert_eq!(bmp.height, 3 * 2 + 1);
        assert_eq!(bmp.pixels.len(), (bmp.width * bmp.height) as usize);
    }

    #[test]
    fn live_cell_becomes_solid_block() {
        let mut g = Grid::new(2, 2);
        g.set(1, 0, ALIVE);
        let bmp = rasterize(&g, 3).unwrap();
        for y in 0..bmp.height as usize {
            for x in 0..bmp.width as usize {
                let expected = if (3..6).contains(&x) && y < 3 {
                    ON_INDEX
                } else {
                    OFF_INDEX
                };
                assert_eq!(bmp.pixels[y * bmp.width as usize + x], expected, "({x},{y})");
            }
        }
    }

    #[test]
    fn only_two_index_values_appear() {
        let mut g = Grid::new(5, 5);
        g.set(2, 2, ALIVE);
        g.set(3, 2, ALIVE);
        let bmp = rasterize(&g, 4).unwrap();
        assert!(bmp.pixels.iter().all(|&p| p == OFF_INDEX || p == ON_INDEX));
    }

    #[test]
    fn magnification_out_of_range_is_rejected() {
        let g = Grid::new(2, 2);
        assert!(rasterize(&g, 0).is_err());
        assert!(rasterize(&g, MAX_MAGNIFICATION + 1).is_err());
        assert!(rasterize(&g, MAX_MAGNIFICATION).is_ok());
    }

    #[test]
    fn png_encoding_is_nonempty_and_signed() {
        let mut g = Grid::new(3, 3);
        g.set(1, 1, ALIVE);
        let bmp = rasterize(&g, 1).unwrap();
        let png = encode_png(&bmp).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
