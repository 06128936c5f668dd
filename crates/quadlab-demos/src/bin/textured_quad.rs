//! 320x200 picture letterboxed into a 1000x500 window, with an arrow sprite
//! following the cursor.

use quadlab_demos::{asset, init, shader_files};
use quadlab_harness::prelude::*;

fn main() -> anyhow::Result<()> {
    init("textured-quad");

    Harness::new()
        .title("Program")
        .size(1000, 500)
        .shaders(shader_files("cursor.frag.wgsl"))
        .image(asset("man.png"))
        .cursor_sprite(asset("arrow.png"))
        .content_size(320, 200)
        .letterbox()
        .clear_color(ColorRgba::sky())
        .vsync(false)
        .run()
}
