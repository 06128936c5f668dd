//! Coordinate and geometry types shared by the runtime, renderer and harness.
//!
//! Canonical CPU space:
//! - physical pixels of the window surface
//! - origin top-left
//! - +X right, +Y down
//!
//! Content space is the pixel space of the displayed buffer (image or
//! procedural texture), same orientation. NDC is `[-1, 1]` with +Y up.

mod color;
mod letterbox;
mod rect;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use letterbox::Letterbox;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
