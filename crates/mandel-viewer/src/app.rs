use mandel_engine::coords::ColorRgba;
use mandel_engine::core::{App, AppControl, FrameCtx};
use mandel_engine::render::{LinkedProgram, RenderCtx, ShaderError, ShaderSource, ShaderWatcher};
use mandel_engine::time::FpsCounter;

use crate::config::ViewerConfig;
use crate::controls::handle_input;
use crate::renderer::FractalRenderer;
use crate::state::ViewerState;

/// Background behind the quad; only visible if a shader discards.
fn clear_color() -> ColorRgba {
    ColorRgba::from_rgba8(64, 64, 64, 255)
}

pub struct ViewerApp {
    state: ViewerState,
    watcher: Option<ShaderWatcher>,
    /// Validated program waiting for the first frame's device.
    initial: Option<LinkedProgram>,
    renderer: Option<FractalRenderer>,
    /// Sources read after a file change, built on the next frame.
    pending: Option<ShaderSource>,
    fps: FpsCounter,
}

impl ViewerApp {
    pub fn new(config: &ViewerConfig, program: LinkedProgram, watcher: Option<ShaderWatcher>) -> Self {
        Self {
            state: ViewerState::new(config),
            watcher,
            initial: Some(program),
            renderer: None,
            pending: None,
            fps: FpsCounter::default(),
        }
    }

    fn poll_shaders(&mut self) {
        let Some(watcher) = self.watcher.as_mut() else { return };
        if !watcher.poll() {
            return;
        }
        log::debug!("shader files changed");
        match watcher.read_sources() {
            Ok(source) => self.pending = Some(source),
            // Editors often truncate before writing; the next write triggers again.
            Err(err) => log::error!("{err}; keeping the previous program"),
        }
    }

    /// Builds the renderer on the first frame and applies pending sources.
    /// Only the initial build can fail; reload failures keep the old pipeline.
    fn sync_renderer(&mut self, rctx: &RenderCtx<'_>) -> Result<(), ShaderError> {
        if self.renderer.is_none() {
            if let Some(program) = self.initial.take() {
                self.renderer = Some(FractalRenderer::new(rctx, &program)?);
            }
        }
        if let Some(renderer) = self.renderer.as_mut() {
            if let Some(source) = self.pending.take() {
                renderer.reload(rctx, &source);
            }
        }
        Ok(())
    }
}

impl App for ViewerApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let viewport = ctx.viewport();
        self.state.set_viewport(viewport);

        let dt = ctx.time.dt;
        if handle_input(&mut self.state, ctx.input, ctx.input_frame, dt) == AppControl::Exit {
            return AppControl::Exit;
        }
        self.state.step(dt);

        if let Some(report) = self.fps.record(ctx.time.raw_dt) {
            log::info!("FPS: {:.3} | dt = {:.3} [ms]", report.fps, report.frame_ms);
            ctx.runtime.set_title(format!("mandel | {:.0} fps", report.fps));
        }

        self.poll_shaders();

        if let Err(err) = self.sync_renderer(&ctx.render_ctx()) {
            ctx.runtime
                .fail(anyhow::Error::new(err).context("building the initial shader pipeline"));
            return AppControl::Exit;
        }

        let frame = self.state.frame_uniforms();
        let tracker = &self.state.tracker;
        let Some(renderer) = self.renderer.as_mut() else {
            return AppControl::Continue;
        };

        ctx.render(clear_color(), |rctx, target| {
            renderer.render(rctx, target, &frame, tracker);
        })
    }
}
