//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and one Window per configured entry, and wires
//! each of them to its own GPU context.

mod pacing;
mod runtime;

pub use pacing::FramePacing;
pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx, WindowMode};
