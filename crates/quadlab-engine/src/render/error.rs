use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Failures raised while building the per-window render resources.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to read {stage} shader {}", .path.display())]
    ShaderRead {
        stage: ShaderStage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader failed to compile: {message}")]
    ShaderCompile { stage: ShaderStage, message: String },

    #[error("shader program failed to link: {message}")]
    ShaderLink { message: String },

    #[error("failed to load texture {}", .path.display())]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("pixel data is {actual} bytes, expected {expected}")]
    PixelBufferSize { expected: usize, actual: usize },
}
