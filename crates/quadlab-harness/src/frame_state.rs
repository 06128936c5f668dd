use quadlab_engine::coords::{Letterbox, Vec2, Viewport};
use quadlab_engine::render::FrameUniforms;
use quadlab_engine::time::FrameTime;

/// Values recomputed at the start of every frame. No history is kept.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameState {
    /// Seconds since the window's clock started.
    pub elapsed: f32,
    pub frame_index: u64,
    /// Last-known cursor position in surface pixels.
    pub cursor_window: Vec2,
    /// Same position in content pixels. Outside `[0, content)` in the margins.
    pub cursor_content: Vec2,
    /// Same position in content NDC, +Y up.
    pub cursor_ndc: Vec2,
}

impl FrameState {
    pub fn compute(time: &FrameTime, cursor_window: Vec2, letterbox: &Letterbox) -> Self {
        let cursor_content = letterbox.window_to_content(cursor_window);
        Self {
            elapsed: time.elapsed as f32,
            frame_index: time.frame_index,
            cursor_window,
            cursor_content,
            cursor_ndc: letterbox.content_to_ndc(cursor_content),
        }
    }

    /// Packs the state into the uniform block the shaders read.
    pub fn uniforms(
        &self,
        letterbox: &Letterbox,
        quad_offset: [f32; 2],
        overlay: Option<Viewport>,
    ) -> FrameUniforms {
        FrameUniforms {
            time: self.elapsed,
            frame: self.frame_index as u32,
            cursor: self.cursor_ndc.to_array(),
            screen_size: letterbox.surface().to_array(),
            content_size: letterbox.content().to_array(),
            quad_offset,
            overlay_size: overlay.map_or([0.0, 0.0], Viewport::to_array),
        }
    }
}
