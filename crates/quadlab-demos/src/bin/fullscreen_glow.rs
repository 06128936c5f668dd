//! Fullscreen glow shader over a textured center strip.

use quadlab_demos::{asset, init, shader_files};
use quadlab_harness::prelude::*;

fn main() -> anyhow::Result<()> {
    init("fullscreen-glow");

    Harness::new()
        .title("Fullscreen")
        .fullscreen()
        .shaders(shader_files("glow.frag.wgsl"))
        .image(asset("texture.png"))
        .geometry(QuadGeometry::region(0.55, 1.0))
        .clear_color(ColorRgba::black())
        .run()
}
