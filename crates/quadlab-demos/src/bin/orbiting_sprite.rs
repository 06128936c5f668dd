//! Small wobbling textured quad circling the screen center.

use quadlab_demos::{asset, init, shader_files};
use quadlab_harness::prelude::*;

fn main() -> anyhow::Result<()> {
    init("orbiting-sprite");

    Harness::new()
        .title("Fullscreen")
        .fullscreen()
        .shaders(shader_files("wobble.frag.wgsl"))
        .image(asset("texture.png"))
        .geometry(QuadGeometry::region(0.25, 0.4))
        .orbit(0.5)
        .clear_color(ColorRgba::black())
        .vsync(true)
        .run()
}
