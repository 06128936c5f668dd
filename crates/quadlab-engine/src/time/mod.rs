//! Time subsystem.
//!
//! Provides frame timing without coupling to the runtime.
//! Intended usage:
//! - one `FrameClock` per window
//! - call `tick()` once per presented frame to obtain `FrameTime`

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
