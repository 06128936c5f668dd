use bytemuck::{Pod, Zeroable};

/// Two triangles sharing the 1–3 diagonal.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    /// NDC position.
    pub pos: [f32; 2],
    /// Texture coordinate, V = 0 at the top row.
    pub uv: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2  // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Vertex data of the single quad a window draws.
///
/// Vertices go top-right, bottom-right, bottom-left, top-left, so
/// [`QUAD_INDICES`] yields `(0, 1, 3)` and `(1, 2, 3)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuadGeometry {
    half_extent: [f32; 2],
    flip_v: bool,
}

impl Default for QuadGeometry {
    fn default() -> Self {
        Self::fullscreen()
    }
}

impl QuadGeometry {
    /// Quad covering the whole viewport.
    pub const fn fullscreen() -> Self {
        Self {
            half_extent: [1.0, 1.0],
            flip_v: false,
        }
    }

    /// Centered quad with the given NDC half extents.
    pub fn region(half_width: f32, half_height: f32) -> Self {
        Self {
            half_extent: [half_width.abs(), half_height.abs()],
            flip_v: false,
        }
    }

    /// Samples the texture bottom row first.
    pub fn flip_v(mut self, flip: bool) -> Self {
        self.flip_v = flip;
        self
    }

    pub fn half_extent(&self) -> [f32; 2] {
        self.half_extent
    }

    pub fn vertices(&self) -> [QuadVertex; 4] {
        let [hw, hh] = self.half_extent;
        let (top, bottom) = if self.flip_v { (1.0, 0.0) } else { (0.0, 1.0) };
        [
            QuadVertex { pos: [hw, hh], uv: [1.0, top] },
            QuadVertex { pos: [hw, -hh], uv: [1.0, bottom] },
            QuadVertex { pos: [-hw, -hh], uv: [0.0, bottom] },
            QuadVertex { pos: [-hw, hh], uv: [0.0, top] },
        ]
    }

    pub fn indices(&self) -> [u32; 6] {
        QUAD_INDICES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fullscreen_covers_ndc() {
        let v = QuadGeometry::fullscreen().vertices();
        assert_eq!(v.len(), 4);
        assert_eq!(v[0].pos, [1.0, 1.0]);
        assert_eq!(v[1].pos, [1.0, -1.0]);
        assert_eq!(v[2].pos, [-1.0, -1.0]);
        assert_eq!(v[3].pos, [-1.0, 1.0]);
    }

    #[test]
    fn indices_form_two_triangles_over_four_vertices() {
        let idx = QuadGeometry::default().indices();
        assert_eq!(idx, [0, 1, 3, 1, 2, 3]);
        assert!(idx.iter().all(|&i| i < 4));
    }

    #[test]
    fn region_uses_half_extents() {
        let g = QuadGeometry::region(0.25, 0.4);
        for v in g.vertices() {
            assert_eq!(v.pos[0].abs(), 0.25);
            assert_eq!(v.pos[1].abs(), 0.4);
        }
        assert_eq!(QuadGeometry::region(-0.55, 1.0).half_extent(), [0.55, 1.0]);
    }

    #[test]
    fn top_row_maps_to_top_edge() {
        let v = QuadGeometry::fullscreen().vertices();
        // Top-right and top-left vertices sample V = 0.
        assert_eq!(v[0].uv, [1.0, 0.0]);
        assert_eq!(v[3].uv, [0.0, 0.0]);
        assert_eq!(v[2].uv, [0.0, 1.0]);
    }

    #[test]
    fn flip_v_swaps_rows_only() {
        let plain = QuadGeometry::fullscreen().vertices();
        let flipped = QuadGeometry::fullscreen().flip_v(true).vertices();
        for (a, b) in plain.iter().zip(flipped.iter()) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.uv[0], b.uv[0]);
            assert_eq!(a.uv[1], 1.0 - b.uv[1]);
        }
    }

    #[test]
    fn vertex_stride_is_four_floats() {
        assert_eq!(QuadVertex::layout().array_stride, 16);
    }
}
