//! Two windows, each with its own GPU context, drawing the same raster.

use quadlab_demos::init;
use quadlab_harness::prelude::*;

fn main() -> anyhow::Result<()> {
    init("twin-windows");

    Harness::new()
        .title("Raster A")
        .size(640, 480)
        .window(WindowSpec::windowed("Raster B", 480, 360))
        .procedural(320, 240, DiagonalBands, Refresh::EveryNth(2))
        .letterbox()
        .run()
}
