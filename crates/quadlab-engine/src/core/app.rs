use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::{FrameCtx, SetupCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Per window the runtime calls, in order: `on_window_ready` once, then
/// `on_window_event`/`on_frame` for as long as the window lives, then
/// `on_window_destroyed` once, before the window's GPU context is dropped.
pub trait App {
    /// Called once after a window and its GPU context exist.
    ///
    /// Returning an error aborts the runtime; [`Runtime::run`](crate::window::Runtime::run)
    /// returns it.
    fn on_window_ready(&mut self, ctx: &mut SetupCtx<'_, '_>) -> anyhow::Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called for window events.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called once per rendered frame per window.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called when a window is about to go away. GPU objects created from the
    /// window's device must be released here.
    fn on_window_destroyed(&mut self, window_id: WindowId) {
        let _ = window_id;
    }
}
