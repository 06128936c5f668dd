//! Static gradient uploaded once, sampled with nearest filtering.

use quadlab_demos::init;
use quadlab_harness::prelude::*;

fn main() -> anyhow::Result<()> {
    init("static-raster");

    Harness::new()
        .title("8-Bit Raster with Shaders")
        .size(640, 480)
        .procedural(640, 480, StaticGradient, Refresh::Once)
        .geometry(QuadGeometry::fullscreen().flip_v(true))
        .run()
}
