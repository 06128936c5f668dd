//! 640x480 pixel buffer regenerated every frame.

use quadlab_demos::init;
use quadlab_harness::prelude::*;

fn main() -> anyhow::Result<()> {
    init("pixel-raster");

    Harness::new()
        .title("8-Bit Raster")
        .size(640, 480)
        .procedural(640, 480, DiagonalBands, Refresh::EveryFrame)
        .vsync(false)
        .run()
}
