use std::path::Path;

use crate::render::RenderError;

/// Image decoded into tightly packed RGBA8 rows, top row first.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Channel count of the source file (1–4).
    pub channels: u8,
    pub pixels: Vec<u8>,
}

/// Decodes an image file from disk.
pub fn decode_image(path: impl AsRef<Path>) -> Result<DecodedImage, RenderError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| RenderError::TextureLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let channels = img.color().channel_count();
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    log::debug!(
        "decoded {} ({width}x{height}, {channels} channels)",
        path.display()
    );

    Ok(DecodedImage {
        width,
        height,
        channels,
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checker.png");

        let img = image::RgbImage::from_fn(3, 2, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgb([255, 0, 0])
            } else {
                image::Rgb([0, 0, 255])
            }
        });
        img.save(&path).unwrap();

        let decoded = decode_image(&path).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.channels, 3);
        assert_eq!(decoded.pixels.len(), 3 * 2 * 4);
        assert_eq!(&decoded.pixels[..8], &[255, 0, 0, 255, 0, 0, 255, 255]);
    }

    #[test]
    fn missing_file_is_a_texture_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.jpg");

        let err = decode_image(&path).unwrap_err();
        assert!(matches!(err, RenderError::TextureLoad { .. }));
        assert!(err.to_string().contains("missing.jpg"));
    }
}
