use mandel_engine::core::AppControl;
use mandel_engine::input::{InputFrame, InputState, Key};
use num_complex::Complex64;

use crate::state::ViewerState;

/// Pan acceleration while a direction key is held, in view widths per second².
const PAN_ACCEL: f64 = 3.0;
/// Keyboard zoom rate: the view scales by `e^rate` per second.
const KEY_ZOOM_RATE: f64 = 1.5;
/// Zoom factor per wheel line.
pub const WHEEL_ZOOM_STEP: f64 = 1.15;

/// Applies one frame of input to the viewer state.
pub fn handle_input(
    state: &mut ViewerState,
    input: &InputState,
    frame: &InputFrame,
    dt: f32,
) -> AppControl {
    if frame.pressed(Key::Escape) {
        return AppControl::Exit;
    }
    if !state.interactive {
        return AppControl::Continue;
    }
    let dt = f64::from(dt);

    if frame.pressed(Key::R) {
        state.reset_camera();
        log::info!("camera reset");
    }
    if frame.pressed(Key::P) {
        let enabled = !state.tracker.is_enabled();
        state.tracker.set_enabled(enabled);
        log::info!("perturbation {}", if enabled { "enabled" } else { "disabled" });
    }
    if frame.pressed(Key::F) {
        log_camera(state);
    }

    let held = |a: Key, b: Key| input.key_down(a) || input.key_down(b);
    let axis = |neg: bool, pos: bool| f64::from(i8::from(pos) - i8::from(neg));

    let dir = Complex64::new(
        axis(held(Key::ArrowLeft, Key::A), held(Key::ArrowRight, Key::D)),
        axis(held(Key::ArrowDown, Key::S), held(Key::ArrowUp, Key::W)),
    );
    if dir.norm_sqr() > 0.0 {
        state.camera.add_velocity(dir * (PAN_ACCEL * dt));
    }

    let zoom_dir = axis(held(Key::Minus, Key::Q), held(Key::Plus, Key::E));
    if zoom_dir != 0.0 {
        state.camera.zoom_at_center((KEY_ZOOM_RATE * zoom_dir * dt).exp());
    }

    let (sw, sh) = (f64::from(state.viewport.width), f64::from(state.viewport.height));

    if frame.wheel_lines != 0.0 {
        let factor = WHEEL_ZOOM_STEP.powf(f64::from(frame.wheel_lines));
        match input.pointer_pos {
            Some((px, py)) => {
                let anchor = state.camera.screen_to_fractal(f64::from(px), f64::from(py), sw, sh);
                state.camera.zoom_at(factor, anchor);
            }
            None => state.camera.zoom_at_center(factor),
        }
    }

    if !frame.drag.is_zero() && sw > 0.0 && sh > 0.0 {
        // Content follows the pointer, so the view moves the other way.
        let (w, h) = state.camera.extent();
        let delta = Complex64::new(
            -f64::from(frame.drag.x) / sw * w,
            f64::from(frame.drag.y) / sh * h,
        );
        state.camera.pan_by(delta);
    }

    AppControl::Continue
}

fn log_camera(state: &ViewerState) {
    let cam = &state.camera;
    let c = cam.center();
    log::info!(
        "center = ({:.17}, {:.17}) width = {:.6e} zoom = {:.6e} perturbation = {}",
        c.re,
        c.im,
        cam.width(),
        cam.zoom(),
        if state.tracker.is_active() { "active" } else { "off" },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use mandel_engine::coords::{Vec2, Viewport};

    fn state() -> ViewerState {
        let mut s = ViewerState::new(&ViewerConfig::default());
        s.set_viewport(Viewport::new(800.0, 800.0, (800, 800)));
        s
    }

    fn press(frame: &mut InputFrame, key: Key) {
        frame.keys_pressed.insert(key);
    }

    #[test]
    fn escape_exits_even_when_static() {
        let mut s = state();
        s.interactive = false;
        let mut f = InputFrame::default();
        press(&mut f, Key::Escape);
        assert_eq!(handle_input(&mut s, &InputState::default(), &f, 0.016), AppControl::Exit);
    }

    #[test]
    fn static_mode_ignores_camera_input() {
        let mut s = state();
        s.interactive = false;
        let before = s.camera.clone();
        let mut f = InputFrame::default();
        f.wheel_lines = 3.0;
        f.drag = Vec2::new(10.0, 10.0);
        assert_eq!(handle_input(&mut s, &InputState::default(), &f, 0.016), AppControl::Continue);
        assert_eq!(s.camera, before);
    }

    #[test]
    fn wheel_zooms_about_cursor() {
        let mut s = state();
        let mut input = InputState::default();
        input.pointer_pos = Some((100.0, 300.0));
        let anchor = s.camera.screen_to_fractal(100.0, 300.0, 800.0, 800.0);

        let mut f = InputFrame::default();
        f.wheel_lines = 2.0;
        handle_input(&mut s, &input, &f, 0.016);

        assert!((s.camera.zoom() - WHEEL_ZOOM_STEP * WHEEL_ZOOM_STEP).abs() < 1e-12);
        let after = s.camera.screen_to_fractal(100.0, 300.0, 800.0, 800.0);
        assert!((after - anchor).norm() < 1e-12);
    }

    #[test]
    fn drag_moves_content_with_pointer() {
        let mut s = state();
        let c0 = s.camera.center();
        let mut f = InputFrame::default();
        f.drag = Vec2::new(80.0, 0.0);
        handle_input(&mut s, &InputState::default(), &f, 0.016);

        // A tenth of the screen to the right = view moves a tenth of its width left.
        let moved = s.camera.center() - c0;
        assert!((moved.re + s.camera.width() / 10.0).abs() < 1e-12);
        assert!(moved.im.abs() < 1e-12);
    }

    #[test]
    fn held_arrow_accelerates_pan() {
        let mut s = state();
        let mut input = InputState::default();
        input.keys_down.insert(Key::ArrowRight);
        input.keys_down.insert(Key::W);
        handle_input(&mut s, &input, &InputFrame::default(), 0.1);

        let v = s.camera.velocity();
        assert!(v.re > 0.0 && v.im > 0.0);
    }

    #[test]
    fn held_plus_zooms_in() {
        let mut s = state();
        let mut input = InputState::default();
        input.keys_down.insert(Key::Plus);
        handle_input(&mut s, &input, &InputFrame::default(), 0.1);
        assert!(s.camera.zoom() > 1.0);
    }

    #[test]
    fn reset_and_toggle_keys() {
        let mut s = state();
        s.camera.zoom_at(100.0, Complex64::new(-1.0, 0.2));
        let mut f = InputFrame::default();
        press(&mut f, Key::R);
        press(&mut f, Key::P);
        handle_input(&mut s, &InputState::default(), &f, 0.016);

        assert_eq!(s.camera.zoom(), 1.0);
        assert!(!s.tracker.is_enabled());
    }
}
