use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use winit::event::WindowEvent;
use winit::window::WindowId;

use quadlab_engine::coords::{ColorRgba, Letterbox, Vec2, Viewport};
use quadlab_engine::core::{App as EngineApp, AppControl, FrameCtx, SetupCtx};
use quadlab_engine::device::GpuInit;
use quadlab_engine::input::Key;
use quadlab_engine::pixels::{decode_image, DecodedImage, PixelBuffer, PixelGenerator};
use quadlab_engine::render::{
    QuadGeometry, QuadRenderer, RenderError, ShaderCode, ShaderProgram, ShaderSource, TextureInit,
};
use quadlab_engine::window::{FramePacing, Runtime, WindowMode};

use crate::config::{BufferSource, HarnessConfig, Motion, Overlay, Refresh, Scaling, WindowSpec};
use crate::frame_state::FrameState;

// ── Harness ───────────────────────────────────────────────────────────────

/// Render loop harness builder.
///
/// Configure the windows, shaders and textures, then call [`run`](Self::run),
/// which blocks until every window is closed.
///
/// ```rust,ignore
/// Harness::new()
///     .title("Program")
///     .size(1000, 500)
///     .shader_files("shaders/vertex.wgsl", "shaders/fragment.wgsl")
///     .image("assets/man.png")
///     .cursor_sprite("assets/arrow.png")
///     .content_size(320, 200)
///     .letterbox()
///     .run()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an explicit configuration.
    pub fn from_config(config: HarnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    fn primary_window(&mut self) -> &mut WindowSpec {
        if self.config.windows.is_empty() {
            self.config.windows.push(WindowSpec::default());
        }
        &mut self.config.windows[0]
    }

    /// Set the first window's title.
    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.primary_window().title = t.into();
        self
    }

    /// Set the first window's size in logical pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.primary_window().mode = WindowMode::Windowed { width, height };
        self
    }

    /// Make the first window borderless fullscreen.
    pub fn fullscreen(mut self) -> Self {
        self.primary_window().mode = WindowMode::Fullscreen;
        self
    }

    /// Open an additional window. Every window draws the same configuration
    /// with its own GPU context.
    pub fn window(mut self, spec: WindowSpec) -> Self {
        self.config.windows.push(spec);
        self
    }

    pub fn shaders(mut self, source: ShaderSource) -> Self {
        self.config.shaders = source;
        self
    }

    /// Read the vertex and fragment stages from WGSL files.
    pub fn shader_files(self, vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        self.shaders(ShaderSource::files(vertex, fragment))
    }

    /// Texture the quad with an image file.
    pub fn image(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.buffer = BufferSource::Image(path.into());
        self
    }

    /// Texture the quad with a generated pixel buffer.
    pub fn procedural(
        mut self,
        width: u32,
        height: u32,
        generator: impl PixelGenerator + 'static,
        refresh: Refresh,
    ) -> Self {
        self.config.buffer = BufferSource::procedural(width, height, generator, refresh);
        self
    }

    /// Draw `path` at the cursor and hide the OS cursor.
    pub fn cursor_sprite(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.overlay = Overlay::CursorSprite(path.into());
        self
    }

    pub fn letterbox(mut self) -> Self {
        self.config.scaling = Scaling::Letterbox;
        self
    }

    pub fn stretch(mut self) -> Self {
        self.config.scaling = Scaling::Stretch;
        self
    }

    /// Content size used for letterboxing and cursor mapping, in place of
    /// the texture's own size.
    pub fn content_size(mut self, width: u32, height: u32) -> Self {
        self.config.content_size = Some((width, height));
        self
    }

    pub fn geometry(mut self, geometry: QuadGeometry) -> Self {
        self.config.geometry = geometry;
        self
    }

    /// Move the quad around the viewport center.
    pub fn orbit(mut self, radius: f32) -> Self {
        self.config.motion = Motion::Orbit { radius };
        self
    }

    pub fn clear_color(mut self, color: ColorRgba) -> Self {
        self.config.clear_color = color;
        self
    }

    pub fn pacing(mut self, pacing: FramePacing) -> Self {
        self.config.pacing = pacing;
        self
    }

    pub fn vsync(mut self, vsync: bool) -> Self {
        self.config.vsync = vsync;
        self
    }

    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.config.close_on_escape = close;
        self
    }

    // ── Entry point ───────────────────────────────────────────────────────

    /// Loads shaders and images, opens the windows and runs until all of them
    /// are closed.
    ///
    /// Shader and image files are read before any window opens, so a missing
    /// asset fails fast.
    pub fn run(self) -> Result<()> {
        let config = self.config;
        config.validate().context("invalid harness configuration")?;

        let code = config.shaders.load().context("failed to load shaders")?;
        let assets = Assets::load(&config)?;

        let windows = config.runtime_configs();
        let pacing = config.pacing;
        let gpu_init = GpuInit::default().with_vsync(config.vsync);

        log::info!(
            "starting harness: {} window(s), {:?}, {:?}",
            windows.len(),
            config.buffer,
            config.scaling
        );

        let state = HarnessState::new(config, code, assets);
        Runtime::run(windows, pacing, gpu_init, state)
    }
}

// ── Assets ────────────────────────────────────────────────────────────────

/// Decoded images shared by every window.
struct Assets {
    image: Option<Rc<DecodedImage>>,
    overlay: Option<Rc<DecodedImage>>,
}

impl Assets {
    fn load(config: &HarnessConfig) -> Result<Self> {
        let image = match &config.buffer {
            BufferSource::Image(path) => Some(Rc::new(decode_image(path)?)),
            BufferSource::Procedural { .. } => None,
        };
        let overlay = match &config.overlay {
            Overlay::CursorSprite(path) => Some(Rc::new(decode_image(path)?)),
            Overlay::None => None,
        };
        Ok(Self { image, overlay })
    }
}

// ── HarnessState ──────────────────────────────────────────────────────────

/// CPU side of a procedural texture.
struct ProceduralPixels {
    buffer: PixelBuffer,
    generator: Rc<dyn PixelGenerator>,
    refresh: Refresh,
    /// Number of regenerations so far; passed to the generator.
    counter: u64,
}

impl ProceduralPixels {
    fn new(width: u32, height: u32, generator: Rc<dyn PixelGenerator>, refresh: Refresh) -> Self {
        let mut buffer = PixelBuffer::new(width, height);
        buffer.fill(generator.as_ref(), 0);
        Self {
            buffer,
            generator,
            refresh,
            counter: 0,
        }
    }

    /// Regenerates the buffer if the policy asks for it on this frame.
    fn refresh(&mut self, frame_index: u64) -> bool {
        if !self.refresh.is_due(frame_index) {
            return false;
        }
        self.counter = self.counter.wrapping_add(1);
        self.buffer.fill(self.generator.as_ref(), self.counter);
        true
    }

    /// Regenerates if due and hands the new pixels to `upload`.
    fn refresh_with(
        &mut self,
        frame_index: u64,
        upload: impl FnOnce(&PixelBuffer) -> Result<(), RenderError>,
    ) -> Result<()> {
        if self.refresh(frame_index) {
            upload(&self.buffer).context("pixel upload failed")?;
        }
        Ok(())
    }
}

/// Everything one window owns.
struct WindowState {
    renderer: QuadRenderer,
    pixels: Option<ProceduralPixels>,
    letterbox: Letterbox,
    /// Last position reported by the window system, in surface pixels.
    cursor: Vec2,
}

/// Internal state that implements `quadlab_engine::core::App`.
struct HarnessState {
    config: HarnessConfig,
    code: ShaderCode,
    assets: Assets,
    windows: HashMap<WindowId, WindowState>,
}

impl HarnessState {
    fn new(config: HarnessConfig, code: ShaderCode, assets: Assets) -> Self {
        Self {
            config,
            code,
            assets,
            windows: HashMap::new(),
        }
    }

    fn letterbox(&self, content: Viewport, surface: Viewport) -> Letterbox {
        let content = self.config.content_viewport(content);
        match self.config.scaling {
            Scaling::Letterbox => Letterbox::fit(content, surface),
            Scaling::Stretch => Letterbox::stretch(content, surface),
        }
    }
}

impl EngineApp for HarnessState {
    fn on_window_ready(&mut self, ctx: &mut SetupCtx<'_, '_>) -> Result<()> {
        let device = ctx.gpu.device();
        let queue = ctx.gpu.queue();

        let program = ShaderProgram::build(device, ctx.gpu.surface_format(), &self.code)?;

        let pixels = match &self.config.buffer {
            BufferSource::Procedural {
                width,
                height,
                generator,
                refresh,
            } => Some(ProceduralPixels::new(*width, *height, Rc::clone(generator), *refresh)),
            BufferSource::Image(_) => None,
        };

        let primary = match (&pixels, &self.assets.image) {
            (Some(p), _) => TextureInit::Pixels(&p.buffer),
            (None, Some(image)) => TextureInit::Image(image),
            (None, None) => anyhow::bail!("no texture source available"),
        };
        let overlay = self.assets.overlay.as_deref().map(TextureInit::Image);

        let renderer = QuadRenderer::new(device, queue, program, &self.config.geometry, primary, overlay)?;

        let letterbox = self.letterbox(renderer.content_size(), ctx.window.physical_size());
        log::debug!("window {:?} viewport {:?}", ctx.window.id, letterbox.viewport());

        self.windows.insert(
            ctx.window.id,
            WindowState {
                renderer,
                pixels,
                letterbox,
                cursor: Vec2::zero(),
            },
        );
        Ok(())
    }

    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        if let WindowEvent::Resized(size) = event {
            let surface = Viewport::from_u32(size.width, size.height);
            if let Some(content) = self.windows.get(&window_id).map(|w| w.renderer.content_size()) {
                let letterbox = self.letterbox(content, surface);
                if let Some(w) = self.windows.get_mut(&window_id) {
                    w.letterbox = letterbox;
                    log::debug!("window {window_id:?} resized, viewport {:?}", letterbox.viewport());
                }
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let id = ctx.window.id;

        if self.config.close_on_escape && ctx.input_frame.pressed(Key::Escape) {
            log::info!("escape pressed, closing window {id:?}");
            ctx.runtime.close_window(id);
            return AppControl::Continue;
        }

        let Some(state) = self.windows.get_mut(&id) else {
            return AppControl::Continue;
        };

        if let Some((x, y)) = ctx.input.pointer_pos {
            state.cursor = Vec2::new(x, y);
        }

        // ── Pixel buffer ──────────────────────────────────────────────────
        if let Some(pixels) = state.pixels.as_mut() {
            let renderer = &state.renderer;
            let queue = ctx.gpu.queue();
            let uploaded = pixels.refresh_with(ctx.time.frame_index, |buffer| {
                renderer.upload_pixels(queue, buffer)
            });
            if let Err(e) = uploaded {
                ctx.runtime.fail(e);
                return AppControl::Exit;
            }
        }

        // ── Uniforms ──────────────────────────────────────────────────────
        let frame = FrameState::compute(&ctx.time, state.cursor, &state.letterbox);
        let uniforms = frame.uniforms(
            &state.letterbox,
            self.config.motion.offset(frame.elapsed),
            state.renderer.overlay_size(),
        );
        state.renderer.write_uniforms(ctx.gpu.queue(), &uniforms);

        // ── Render ────────────────────────────────────────────────────────
        let renderer = &state.renderer;
        let viewport = state.letterbox.viewport();
        ctx.render(self.config.clear_color, |rctx, target| {
            renderer.draw(rctx, target, viewport);
        })
    }

    fn on_window_destroyed(&mut self, window_id: WindowId) {
        if let Some(state) = self.windows.remove(&window_id) {
            let order = state.renderer.release();
            log::debug!("window {window_id:?} released {}", order.join(" -> "));
        }
    }
}

#[cfg(test)]
mod tests {
    use quadlab_engine::coords::Rect;

    use super::*;
    use crate::patterns::{DiagonalBands, StaticGradient};

    // ── builder ───────────────────────────────────────────────────────────

    #[test]
    fn builder_configures_first_window() {
        let h = Harness::new().title("Program").size(1000, 500);
        let w = &h.config().windows[0];
        assert_eq!(w.title, "Program");
        assert_eq!(w.mode, WindowMode::Windowed { width: 1000, height: 500 });
        assert_eq!(h.config().windows.len(), 1);

        let h = h.fullscreen();
        assert_eq!(h.config().windows[0].mode, WindowMode::Fullscreen);
    }

    #[test]
    fn extra_windows_are_appended() {
        let h = Harness::new()
            .title("first")
            .window(WindowSpec::windowed("second", 640, 480));
        let titles: Vec<&str> = h.config().windows.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn builder_sets_sources_and_behavior() {
        let h = Harness::new()
            .shader_files("v.wgsl", "f.wgsl")
            .image("man.png")
            .cursor_sprite("arrow.png")
            .content_size(320, 200)
            .letterbox()
            .orbit(0.5)
            .vsync(true)
            .close_on_escape(false);
        let c = h.config();

        assert_eq!(c.shaders, ShaderSource::files("v.wgsl", "f.wgsl"));
        assert!(matches!(&c.buffer, BufferSource::Image(p) if p.ends_with("man.png")));
        assert_eq!(c.overlay, Overlay::CursorSprite("arrow.png".into()));
        assert_eq!(c.content_size, Some((320, 200)));
        assert_eq!(c.scaling, Scaling::Letterbox);
        assert_eq!(c.motion, Motion::Orbit { radius: 0.5 });
        assert!(c.vsync);
        assert!(!c.close_on_escape);
    }

    #[test]
    fn run_fails_before_opening_windows_when_shaders_are_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = Harness::new()
            .shader_files(dir.path().join("v.wgsl"), dir.path().join("f.wgsl"))
            .run()
            .unwrap_err();
        assert!(format!("{err:#}").contains("vertex"));
    }

    #[test]
    fn run_fails_when_image_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = Harness::new()
            .image(dir.path().join("missing.png"))
            .run()
            .unwrap_err();
        assert!(format!("{err:#}").contains("missing.png"));
    }

    // ── procedural refresh ────────────────────────────────────────────────

    #[test]
    fn setup_fill_uses_counter_zero() {
        let p = ProceduralPixels::new(8, 4, Rc::new(DiagonalBands), Refresh::Once);
        let mut expected = PixelBuffer::new(8, 4);
        expected.fill(&DiagonalBands, 0);
        assert_eq!(p.buffer, expected);
    }

    #[test]
    fn every_frame_regenerates_with_next_counter() {
        let mut p = ProceduralPixels::new(8, 4, Rc::new(DiagonalBands), Refresh::EveryFrame);
        assert!(p.refresh(0));
        assert!(p.refresh(1));
        assert_eq!(p.counter, 2);

        let mut expected = PixelBuffer::new(8, 4);
        expected.fill(&DiagonalBands, 2);
        assert_eq!(p.buffer, expected);
    }

    #[test]
    fn once_keeps_setup_buffer() {
        let mut p = ProceduralPixels::new(8, 4, Rc::new(StaticGradient), Refresh::Once);
        let before = p.buffer.clone();
        assert!(!(0..10).any(|f| p.refresh(f)));
        assert_eq!(p.buffer, before);
        assert_eq!(p.counter, 0);
    }

    #[test]
    fn failed_upload_is_reported_with_context() {
        let mut p = ProceduralPixels::new(4, 4, Rc::new(DiagonalBands), Refresh::EveryFrame);
        let err = p
            .refresh_with(0, |buffer| {
                Err(RenderError::PixelBufferSize {
                    expected: buffer.as_bytes().len() + 1,
                    actual: buffer.as_bytes().len(),
                })
            })
            .unwrap_err();
        assert!(format!("{err:#}").contains("pixel upload failed"));
    }

    #[test]
    fn upload_is_skipped_when_not_due() {
        let mut p = ProceduralPixels::new(4, 4, Rc::new(DiagonalBands), Refresh::EveryNth(3));
        let mut uploads = 0;
        for frame in 0..6 {
            p.refresh_with(frame, |_| {
                uploads += 1;
                Ok(())
            })
            .unwrap();
        }
        assert_eq!(uploads, 2);
    }

    // ── scaling ───────────────────────────────────────────────────────────

    #[test]
    fn letterbox_uses_content_override() {
        let state = HarnessState::new(
            HarnessConfig {
                content_size: Some((320, 200)),
                scaling: Scaling::Letterbox,
                ..Default::default()
            },
            ShaderCode {
                vertex: String::new(),
                fragment: String::new(),
            },
            Assets {
                image: None,
                overlay: None,
            },
        );
        let lb = state.letterbox(Viewport::new(64.0, 64.0), Viewport::new(800.0, 480.0));
        assert_eq!(lb.viewport(), Rect::new(16.0, 0.0, 768.0, 480.0));
    }

    #[test]
    fn stretch_fills_surface() {
        let state = HarnessState::new(
            HarnessConfig::default(),
            ShaderCode {
                vertex: String::new(),
                fragment: String::new(),
            },
            Assets {
                image: None,
                overlay: None,
            },
        );
        let lb = state.letterbox(Viewport::new(320.0, 200.0), Viewport::new(1000.0, 500.0));
        assert_eq!(lb.viewport(), Rect::new(0.0, 0.0, 1000.0, 500.0));
    }
}
