use anyhow::{Context, Result};
use ouroboros::self_referencing;
use std::collections::HashMap;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, SetupCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::{FrameClock, FrameTime};

use super::FramePacing;

/// How a window occupies the screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WindowMode {
    /// Decorated window with the given logical inner size.
    Windowed { width: u32, height: u32 },
    /// Borderless fullscreen on the current monitor.
    Fullscreen,
}

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub mode: WindowMode,
    /// Hide the OS cursor while it is over the window.
    pub cursor_visible: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "quadlab".to_string(),
            mode: WindowMode::Windowed {
                width: 1000,
                height: 500,
            },
            cursor_visible: true,
        }
    }
}

impl RuntimeConfig {
    fn window_attributes(&self) -> WindowAttributes {
        let attrs = Window::default_attributes().with_title(self.title.clone());
        match self.mode {
            WindowMode::Windowed { width, height } => {
                attrs.with_inner_size(LogicalSize::new(width as f64, height as f64))
            }
            WindowMode::Fullscreen => attrs
                .with_fullscreen(Some(Fullscreen::Borderless(None)))
                .with_decorations(false),
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn close_window(&mut self, id: WindowId) {
        self.commands.push(Command::CloseWindow(id));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }

    /// Stops the loop with an unrecoverable error; [`Runtime::run`] returns it.
    pub fn fail(&mut self, err: anyhow::Error) {
        self.commands.push(Command::Fail(err));
    }
}

enum Command {
    CloseWindow(WindowId),
    Exit,
    Fail(anyhow::Error),
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens every configured window and drives `app` until all of them are
    /// closed.
    ///
    /// Errors raised while creating a window, its GPU context, or by
    /// [`App::on_window_ready`](crate::core::App::on_window_ready) stop the
    /// loop and are returned here.
    pub fn run<A>(windows: Vec<RuntimeConfig>, pacing: FramePacing, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        anyhow::ensure!(!windows.is_empty(), "no windows configured");

        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state: AppState<A> = AppState::new(windows, pacing, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.into_result()
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Event-loop state. `E` is the per-window entry; tests substitute their own.
struct AppState<A, E = WindowEntry>
where
    A: CoreApp + 'static,
{
    pending: Vec<RuntimeConfig>,
    pacing: FramePacing,
    gpu_init: GpuInit,
    app: A,

    windows: HashMap<WindowId, E>,
    next_frame: Instant,
    started: bool,
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<A, E> AppState<A, E>
where
    A: CoreApp + 'static,
{
    fn new(pending: Vec<RuntimeConfig>, pacing: FramePacing, gpu_init: GpuInit, app: A) -> Self {
        Self {
            pending,
            pacing,
            gpu_init,
            app,
            windows: HashMap::new(),
            next_frame: Instant::now(),
            started: false,
            exit_requested: false,
            fatal: None,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// Records the first fatal error and asks the loop to stop.
    fn fail(&mut self, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.request_exit();
    }

    fn destroy_window_entry(&mut self, id: WindowId) {
        if !self.windows.contains_key(&id) {
            return;
        }
        // The app releases its GPU objects before the entry drops the context.
        self.app.on_window_destroyed(id);
        self.windows.remove(&id);
        log::info!("window {id:?} destroyed");
    }

    fn destroy_all(&mut self) {
        let ids: Vec<WindowId> = self.windows.keys().copied().collect();
        for id in ids {
            self.destroy_window_entry(id);
        }
    }

    fn apply_commands(&mut self, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::CloseWindow(id) => self.destroy_window_entry(id),
                Command::Exit => self.request_exit(),
                Command::Fail(err) => self.fail(err),
            }
        }

        if self.windows.is_empty() {
            self.request_exit();
        }
    }

    fn into_result(mut self) -> Result<()> {
        match self.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<A> AppState<A, WindowEntry>
where
    A: CoreApp + 'static,
{
    fn create_window_entry(
        &mut self,
        event_loop: &ActiveEventLoop,
        config: RuntimeConfig,
    ) -> Result<WindowId> {
        let window = event_loop
            .create_window(config.window_attributes())
            .with_context(|| format!("failed to create window \"{}\"", config.title))?;

        if !config.cursor_visible {
            window.set_cursor_visible(false);
        }

        let id = window.id();
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .with_context(|| format!("GPU initialization failed for window \"{}\"", config.title))?;

        log::info!("window \"{}\" created ({:?})", config.title, config.mode);
        self.windows.insert(id, entry);

        let (app, windows) = (&mut self.app, &self.windows);
        if let Some(entry) = windows.get(&id) {
            entry
                .with(|fields| {
                    let mut ctx = SetupCtx {
                        window: WindowCtx {
                            id,
                            window: fields.window,
                        },
                        gpu: fields.gpu,
                    };
                    app.on_window_ready(&mut ctx)
                })
                .with_context(|| format!("failed to set up window \"{}\"", config.title))?;
        }

        Ok(id)
    }
}

impl<A> ApplicationHandler for AppState<A, WindowEntry>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        for config in std::mem::take(&mut self.pending) {
            if let Err(e) = self.create_window_entry(event_loop, config) {
                self.fail(e);
                event_loop.exit();
                return;
            }
        }

        for entry in self.windows.values() {
            entry.with_window(|w| w.request_redraw());
        }
        self.next_frame = self.pacing.next_deadline(Instant::now());
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let now = Instant::now();
        if self.pacing.redraw_due(now, self.next_frame) {
            for entry in self.windows.values() {
                entry.with_window(|w| w.request_redraw());
            }
            self.next_frame = self.pacing.next_deadline(now);
        }

        event_loop.set_control_flow(self.pacing.control_flow(self.next_frame));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, windows) = (&mut self.app, &mut self.windows);

        let Some(entry) = windows.get_mut(&window_id) else {
            return;
        };

        let mut exit_from_app_event = false;

        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(&event) {
                fields.input_state.apply_event(fields.input_frame, ev);
            }

            if app.on_window_event(window_id, &event) == AppControl::Exit {
                exit_from_app_event = true;
            }
        });

        if exit_from_app_event {
            self.request_exit();
            event_loop.exit();
            return;
        }

        // Runtime-managed window lifecycle / resize / redraw handling.
        match &event {
            WindowEvent::CloseRequested => {
                self.destroy_window_entry(window_id);
                if self.windows.is_empty() {
                    self.request_exit();
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => {
                let mut runtime_ctx = RuntimeCtx::default();
                let mut app_control = AppControl::Continue;

                let (app, windows) = (&mut self.app, &mut self.windows);
                if let Some(entry) = windows.get_mut(&window_id) {
                    entry.with_mut(|fields| {
                        let ft: FrameTime = fields.clock.tick();

                        // Scope to ensure `ctx` is dropped before mutating frame state.
                        {
                            let mut ctx = FrameCtx {
                                window: WindowCtx {
                                    id: window_id,
                                    window: fields.window,
                                },
                                gpu: fields.gpu,
                                input: fields.input_state,
                                input_frame: fields.input_frame,
                                time: ft,
                                runtime: &mut runtime_ctx,
                            };

                            app_control = app.on_frame(&mut ctx);
                        }

                        // Clear per-frame deltas after the frame is consumed.
                        fields.input_frame.clear();
                    });
                }

                if app_control == AppControl::Exit {
                    runtime_ctx.exit();
                }

                self.apply_commands(runtime_ctx);
            }

            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.destroy_all();
    }
}
