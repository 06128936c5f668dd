//! CPU-side pixel data: procedural buffers and decoded images.
//!
//! Both end up as tightly packed RGBA8 rows (top row first) before upload,
//! since wgpu has no three-channel 8-bit texture format.

mod buffer;
mod decode;

pub use buffer::{expand_to_rgba, PixelBuffer, PixelGenerator};
pub use decode::{decode_image, DecodedImage};
