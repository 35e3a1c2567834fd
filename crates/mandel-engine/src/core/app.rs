use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::FrameCtx;

/// Returned from every callback; `Exit` closes the window and ends the loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Callbacks the runtime drives.
pub trait App {
    /// Raw window events, delivered after input state has been updated.
    /// Most apps only need the input snapshot in [`FrameCtx`].
    fn on_window_event(&mut self, _window_id: WindowId, _event: &WindowEvent) -> AppControl {
        AppControl::Continue
    }

    /// Update and draw one frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
