use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{ensure, Result};

use quadlab_engine::coords::{ColorRgba, Viewport};
use quadlab_engine::pixels::PixelGenerator;
use quadlab_engine::render::{QuadGeometry, ShaderSource};
use quadlab_engine::window::{FramePacing, RuntimeConfig, WindowMode};

use crate::shaders;

// ── windows ───────────────────────────────────────────────────────────────

/// One window the harness opens.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub title: String,
    pub mode: WindowMode,
    pub cursor_visible: bool,
}

impl WindowSpec {
    pub fn windowed(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            mode: WindowMode::Windowed { width, height },
            cursor_visible: true,
        }
    }

    pub fn fullscreen(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            mode: WindowMode::Fullscreen,
            cursor_visible: true,
        }
    }

    pub(crate) fn runtime_config(&self, hide_cursor: bool) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            mode: self.mode,
            cursor_visible: self.cursor_visible && !hide_cursor,
        }
    }
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self::windowed("quadlab", 1000, 500)
    }
}

// ── pixel source ──────────────────────────────────────────────────────────

/// When a procedural buffer is regenerated.
///
/// The buffer is always filled once while the window is set up; the policy
/// decides which later frames refill it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Refresh {
    Once,
    EveryFrame,
    /// Every `n`th frame, starting with frame 0.
    EveryNth(u32),
}

impl Refresh {
    /// Whether the frame with the given index regenerates the buffer.
    pub fn is_due(self, frame_index: u64) -> bool {
        match self {
            Refresh::Once => false,
            Refresh::EveryFrame => true,
            Refresh::EveryNth(0) => false,
            Refresh::EveryNth(n) => frame_index % u64::from(n) == 0,
        }
    }
}

/// Where the primary texture comes from.
#[derive(Clone)]
pub enum BufferSource {
    /// Image file decoded once at startup.
    Image(PathBuf),
    /// CPU pixel buffer filled by `generator`.
    Procedural {
        width: u32,
        height: u32,
        generator: Rc<dyn PixelGenerator>,
        refresh: Refresh,
    },
}

impl BufferSource {
    pub fn procedural(
        width: u32,
        height: u32,
        generator: impl PixelGenerator + 'static,
        refresh: Refresh,
    ) -> Self {
        Self::Procedural {
            width,
            height,
            generator: Rc::new(generator),
            refresh,
        }
    }
}

impl fmt::Debug for BufferSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferSource::Image(path) => f.debug_tuple("Image").field(path).finish(),
            BufferSource::Procedural {
                width,
                height,
                refresh,
                ..
            } => f
                .debug_struct("Procedural")
                .field("width", width)
                .field("height", height)
                .field("refresh", refresh)
                .finish_non_exhaustive(),
        }
    }
}

/// Second texture drawn over the primary one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    /// Sprite the fragment shader draws at the cursor. Hides the OS cursor.
    CursorSprite(PathBuf),
}

/// How the content rectangle is placed in the window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Scaling {
    /// Fill the window, ignoring aspect ratio.
    #[default]
    Stretch,
    /// Largest centered rectangle with the content's aspect ratio.
    Letterbox,
}

/// Quad movement over time.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum Motion {
    #[default]
    Still,
    /// Circle around the viewport center, one radian per second.
    Orbit { radius: f32 },
}

impl Motion {
    /// NDC offset of the quad `elapsed` seconds after start.
    pub fn offset(self, elapsed: f32) -> [f32; 2] {
        match self {
            Motion::Still => [0.0, 0.0],
            Motion::Orbit { radius } => [elapsed.sin() * radius, elapsed.cos() * radius],
        }
    }
}

// ── harness ───────────────────────────────────────────────────────────────

/// Everything a harness run needs. Built through [`Harness`](crate::Harness).
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub windows: Vec<WindowSpec>,
    pub shaders: ShaderSource,
    pub buffer: BufferSource,
    pub overlay: Overlay,
    pub scaling: Scaling,
    /// Logical content size used for letterboxing and cursor mapping.
    /// Defaults to the primary texture's size.
    pub content_size: Option<(u32, u32)>,
    pub geometry: QuadGeometry,
    pub motion: Motion,
    pub clear_color: ColorRgba,
    pub pacing: FramePacing,
    pub vsync: bool,
    pub close_on_escape: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            windows: vec![WindowSpec::default()],
            shaders: ShaderSource::inline(shaders::QUAD_VERTEX, shaders::QUAD_FRAGMENT),
            buffer: BufferSource::procedural(320, 200, crate::patterns::StaticGradient, Refresh::Once),
            overlay: Overlay::None,
            scaling: Scaling::Stretch,
            content_size: None,
            geometry: QuadGeometry::fullscreen(),
            motion: Motion::Still,
            clear_color: ColorRgba::sky(),
            pacing: FramePacing::default(),
            vsync: false,
            close_on_escape: true,
        }
    }
}

impl HarnessConfig {
    /// Rejects configurations that cannot produce a window.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.windows.is_empty(), "at least one window is required");

        for w in &self.windows {
            if let WindowMode::Windowed { width, height } = w.mode {
                ensure!(
                    width > 0 && height > 0,
                    "window \"{}\" has zero size ({width}x{height})",
                    w.title
                );
            }
        }

        if let BufferSource::Procedural {
            width,
            height,
            refresh,
            ..
        } = &self.buffer
        {
            ensure!(
                *width > 0 && *height > 0,
                "pixel buffer has zero size ({width}x{height})"
            );
            ensure!(
                *refresh != Refresh::EveryNth(0),
                "refresh interval must be at least one frame"
            );
        }

        if let Some((w, h)) = self.content_size {
            ensure!(w > 0 && h > 0, "content size has zero area ({w}x{h})");
        }

        if let Motion::Orbit { radius } = self.motion {
            ensure!(radius.is_finite(), "orbit radius must be finite");
        }

        ensure!(self.clear_color.is_finite(), "clear color must be finite");
        Ok(())
    }

    /// Content size: the override, or the primary texture's size.
    pub fn content_viewport(&self, texture: Viewport) -> Viewport {
        match self.content_size {
            Some((w, h)) => Viewport::from_u32(w, h),
            None => texture,
        }
    }

    pub(crate) fn hides_cursor(&self) -> bool {
        matches!(self.overlay, Overlay::CursorSprite(_))
    }

    pub(crate) fn runtime_configs(&self) -> Vec<RuntimeConfig> {
        let hide = self.hides_cursor();
        self.windows.iter().map(|w| w.runtime_config(hide)).collect()
    }
}
