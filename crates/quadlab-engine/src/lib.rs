//! Quadlab engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the harness:
//! window runtime, GPU context, input tracking, frame timing, the textured
//! quad renderer and the CPU-side pixel buffers it displays.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod pixels;
pub mod render;
