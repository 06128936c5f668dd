//! Shared helpers for the demo programs.

use std::path::PathBuf;

use quadlab_engine::logging::{init_logging, LoggingConfig};
use quadlab_engine::render::ShaderSource;

/// Path of a file under this crate's `assets/` directory.
pub fn asset(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets").join(name)
}

/// The shared quad vertex stage paired with `shaders/<fragment>`.
pub fn shader_files(fragment: &str) -> ShaderSource {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("shaders");
    ShaderSource::files(dir.join("quad.vert.wgsl"), dir.join(fragment))
}

/// Initializes logging and announces the demo.
pub fn init(name: &str) {
    init_logging(LoggingConfig::default());
    log::info!("{name}: press Escape or close the window to quit");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_assets_exist() {
        for name in ["man.png", "arrow.png", "texture.png"] {
            assert!(asset(name).is_file(), "missing asset {name}");
        }
    }

    #[test]
    fn bundled_shaders_load() {
        for frag in ["cursor.frag.wgsl", "glow.frag.wgsl", "wobble.frag.wgsl"] {
            let code = shader_files(frag).load().unwrap();
            assert!(code.vertex.contains("fn vs_main("));
            assert!(code.fragment.contains("fn fs_main("));
        }
    }

    #[test]
    fn bundled_images_decode() {
        let arrow = quadlab_engine::pixels::decode_image(asset("arrow.png")).unwrap();
        assert_eq!((arrow.width, arrow.height), (12, 20));
        assert_eq!(arrow.channels, 4);

        let man = quadlab_engine::pixels::decode_image(asset("man.png")).unwrap();
        assert_eq!((man.width, man.height), (320, 200));
    }
}
