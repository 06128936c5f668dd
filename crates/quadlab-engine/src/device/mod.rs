//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue for one window
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and presenting them
//! - releasing GPU objects in reverse creation order

mod error;
mod frame;
mod gpu;
mod init;
mod release;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use release::{Release, ReleaseQueue};
