//! Quadlab harness: a configurable render loop for textured-quad experiments.
//!
//! Every window runs the same loop: wait for events (or poll), recompute the
//! frame state, regenerate the pixel buffer when its refresh policy says so,
//! write the uniforms, draw one quad and present.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use quadlab_harness::prelude::*;
//!
//! Harness::new()
//!     .title("8-Bit Raster")
//!     .size(640, 480)
//!     .procedural(640, 480, DiagonalBands, Refresh::EveryFrame)
//!     .run()?;
//! ```

pub mod app;
pub mod config;
pub mod frame_state;
pub mod patterns;
pub mod shaders;

pub use app::Harness;
pub use config::{BufferSource, HarnessConfig, Motion, Overlay, Refresh, Scaling, WindowSpec};
pub use quadlab_engine::window::{FramePacing, WindowMode};

/// Everything a demo program needs.
pub mod prelude {
    pub use crate::app::Harness;
    pub use crate::config::{BufferSource, HarnessConfig, Motion, Overlay, Refresh, Scaling, WindowSpec};
    pub use crate::patterns::{DiagonalBands, StaticGradient};

    pub use quadlab_engine::coords::ColorRgba;
    pub use quadlab_engine::pixels::PixelGenerator;
    pub use quadlab_engine::render::{QuadGeometry, ShaderSource};
    pub use quadlab_engine::window::{FramePacing, WindowMode};
}
