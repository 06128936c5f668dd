//! Built-in procedural pixel patterns.
//!
//! Channel values are taken modulo 256; negative intermediates wrap the
//! same way an 8-bit store would.

use quadlab_engine::pixels::PixelGenerator;

#[inline]
fn wrap(v: i64) -> u8 {
    v.rem_euclid(256) as u8
}

/// Diagonal color bands that scroll with the frame counter.
///
/// `r = x + y + i`, `g = 2y - x`, `b = 4x + 4y + 2i`.
#[derive(Debug, Copy, Clone, Default)]
pub struct DiagonalBands;

impl PixelGenerator for DiagonalBands {
    fn pixel(&self, x: u32, y: u32, frame: u64) -> [u8; 3] {
        let (x, y) = (i64::from(x), i64::from(y));
        let i = (frame % 256) as i64;
        [
            wrap(x + y + i),
            wrap(2 * y - x),
            wrap(4 * x + 4 * y + 2 * i),
        ]
    }
}

/// Static gradient: `r = x + y`, `g = 2x + y`, `b = x + 2y`.
#[derive(Debug, Copy, Clone, Default)]
pub struct StaticGradient;

impl PixelGenerator for StaticGradient {
    fn pixel(&self, x: u32, y: u32, _frame: u64) -> [u8; 3] {
        let (x, y) = (i64::from(x), i64::from(y));
        [wrap(x + y), wrap(2 * x + y), wrap(x + 2 * y)]
    }
}
