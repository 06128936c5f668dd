use bytemuck::{Pod, Zeroable};

/// Per-frame uniform block at binding 0.
///
/// WGSL mirror:
/// ```wgsl
/// struct Frame {
///     time: f32,
///     frame: u32,
///     cursor: vec2<f32>,
///     screen_size: vec2<f32>,
///     content_size: vec2<f32>,
///     quad_offset: vec2<f32>,
///     overlay_size: vec2<f32>,
/// }
/// ```
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    /// Seconds since the window's clock started.
    pub time: f32,
    pub frame: u32,
    /// Cursor in content NDC, +Y up.
    pub cursor: [f32; 2],
    /// Surface size in physical pixels.
    pub screen_size: [f32; 2],
    /// Texture (content) size in pixels.
    pub content_size: [f32; 2],
    /// NDC translation applied to the quad.
    pub quad_offset: [f32; 2],
    /// Overlay texture size in pixels; zero when there is no overlay.
    pub overlay_size: [f32; 2],
}

impl FrameUniforms {
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    pub(crate) fn min_binding_size() -> Option<std::num::NonZeroU64> {
        std::num::NonZeroU64::new(Self::SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_wgsl_struct() {
        // Uniform structs are sized in multiples of 16 bytes.
        assert_eq!(FrameUniforms::SIZE, 48);
        assert_eq!(FrameUniforms::SIZE % 16, 0);
        assert!(FrameUniforms::min_binding_size().is_some());
    }

    #[test]
    fn fields_land_at_wgsl_offsets() {
        let u = FrameUniforms {
            time: 1.5,
            frame: 7,
            cursor: [0.25, -0.5],
            screen_size: [1000.0, 500.0],
            content_size: [320.0, 200.0],
            quad_offset: [0.0, 0.5],
            overlay_size: [16.0, 16.0],
        };
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&u));
        assert_eq!(floats[0], 1.5);
        assert_eq!(floats[2..4], [0.25, -0.5]);
        assert_eq!(floats[4..6], [1000.0, 500.0]);
        assert_eq!(floats[6..8], [320.0, 200.0]);
        assert_eq!(floats[8..10], [0.0, 0.5]);
        assert_eq!(floats[10..12], [16.0, 16.0]);

        let words: &[u32] = bytemuck::cast_slice(bytemuck::bytes_of(&u));
        assert_eq!(words[1], 7);
    }
}
