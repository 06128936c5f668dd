//! GPU rendering subsystem.
//!
//! One textured quad per window: a shader program with a fixed binding
//! layout, a static 4-vertex/6-index geometry buffer, a primary texture and an
//! optional overlay texture, plus a small uniform block written every frame.
//!
//! Convention:
//! - quad positions are NDC (`[-1, 1]`, +Y up); texture V runs top to bottom
//! - the quad is drawn into a viewport rectangle chosen by the caller
//!   (whole surface, or the letterboxed content rectangle)

mod ctx;
mod error;
mod geometry;
mod quad;
mod shader;
mod texture;
mod uniforms;

pub use ctx::{RenderCtx, RenderTarget};
pub use error::{RenderError, ShaderStage};
pub use geometry::{QuadGeometry, QuadVertex, QUAD_INDICES};
pub use quad::{QuadRenderer, TextureInit};
pub use shader::{ShaderCode, ShaderProgram, ShaderSource, FS_ENTRY, VS_ENTRY};
pub use texture::{QuadTexture, Sampling};
pub use uniforms::FrameUniforms;
