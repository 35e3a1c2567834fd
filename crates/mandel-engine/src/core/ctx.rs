use winit::dpi::LogicalSize;
use winit::window::{Window, WindowId};

use crate::coords::{ColorRgba, Viewport};
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// The viewer window.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// Inner size in logical pixels, the unit pointer positions are reported in.
    pub fn logical_size(&self) -> (f32, f32) {
        let size: LogicalSize<f64> = self.window.inner_size().to_logical(self.window.scale_factor());
        (size.width as f32, size.height as f32)
    }
}

/// Everything [`App::on_frame`](super::App::on_frame) gets to work with.
///
/// `'a` lasts for the callback; `'w` is the window borrow held by `Gpu<'w>`.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_, '_> {
    pub fn viewport(&self) -> Viewport {
        let (w, h) = self.window.logical_size();
        let size = self.gpu.size();
        Viewport::new(w, h, (size.width, size.height))
    }

    /// Device access outside of [`render`](Self::render), e.g. to build
    /// pipelines before the frame is acquired.
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.viewport(),
        )
    }

    /// Acquires the next image, clears it to `clear`, lets `draw` record into
    /// it, then presents.
    ///
    /// Nothing is drawn while the window is minimized or the surface is
    /// recovering; an out-of-memory surface returns [`AppControl::Exit`].
    pub fn render<F>(&mut self, clear: ColorRgba, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let viewport = self.viewport();
        if viewport.physical.0 == 0 || viewport.physical.1 == 0 {
            return AppControl::Continue;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    _ => AppControl::Continue,
                };
            }
        };

        {
            let rctx = RenderCtx::new(
                self.gpu.device(),
                self.gpu.queue(),
                self.gpu.surface_format(),
                viewport,
            );
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            target.clear(clear);
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);
        AppControl::Continue
    }
}
