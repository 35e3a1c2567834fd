use mandel_engine::coords::Viewport;

use crate::camera::Camera;
use crate::config::ViewerConfig;
use crate::orbit::OrbitTracker;
use crate::uniforms::FrameUniforms;

/// Everything the viewer mutates between frames.
#[derive(Debug, Clone)]
pub struct ViewerState {
    pub camera: Camera,
    pub tracker: OrbitTracker,
    pub viewport: Viewport,
    /// False in `--static` mode: the camera stays at the home view.
    pub interactive: bool,
}

impl ViewerState {
    pub fn new(config: &ViewerConfig) -> Self {
        let viewport = Viewport::default();
        Self {
            camera: Camera::home(viewport.aspect()),
            tracker: OrbitTracker::new(config.perturbation),
            viewport,
            interactive: config.interactive,
        }
    }

    /// Follows the drawable size; the camera keeps its center and width.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        if viewport.is_valid() {
            self.camera.set_aspect(viewport.aspect());
        }
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset(self.viewport.aspect());
    }

    /// Advances the camera and brings the orbit up to date.
    /// Returns true when the orbit was recomputed.
    pub fn step(&mut self, dt: f32) -> bool {
        self.camera.step(f64::from(dt));
        self.tracker.update(&self.camera)
    }

    pub fn frame_uniforms(&self) -> FrameUniforms {
        FrameUniforms::new(&self.camera, &self.tracker, self.viewport.physical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_keeps_center_and_width() {
        let mut state = ViewerState::new(&ViewerConfig::default());
        state.set_viewport(Viewport::new(800.0, 400.0, (1600, 800)));
        let (center, width) = (state.camera.center(), state.camera.width());

        state.set_viewport(Viewport::new(400.0, 400.0, (800, 800)));
        assert_eq!(state.camera.center(), center);
        assert!((state.camera.width() - width).abs() < 1e-12);
        assert!((state.camera.extent().1 - width).abs() < 1e-12);
        assert_eq!(state.frame_uniforms().screen_dim, [800, 800]);
    }

    #[test]
    fn minimized_window_leaves_camera_alone() {
        let mut state = ViewerState::new(&ViewerConfig::default());
        state.set_viewport(Viewport::new(800.0, 400.0, (800, 400)));
        let before = state.camera.clone();
        state.set_viewport(Viewport::new(0.0, 0.0, (0, 0)));
        assert_eq!(state.camera, before);
    }
}
