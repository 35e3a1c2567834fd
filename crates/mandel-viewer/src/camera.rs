//! Fractal-space camera.
//!
//! The view is the rectangle between `top_left` and `bottom_right` in the
//! complex plane (imaginary axis up, so `top_left.im > bottom_right.im`).
//! Everything is f64; the shader only ever sees f32 copies.

use num_complex::Complex64;

pub const HOME_CENTER: Complex64 = Complex64::new(-0.5, 0.0);
pub const HOME_WIDTH: f64 = 3.5;

pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 1e12;

/// Velocity decay rate, per second.
const DAMPING: f64 = 4.0;
/// Below this speed (view widths per second) the camera stops.
const REST_SPEED: f64 = 1e-3;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    top_left: Complex64,
    bottom_right: Complex64,
    zoom: f64,
    /// Pan velocity in view widths per second, so panning feels the same at any zoom.
    velocity: Complex64,
}

impl Camera {
    pub fn home(aspect: f64) -> Self {
        let mut cam = Self {
            top_left: HOME_CENTER,
            bottom_right: HOME_CENTER,
            zoom: 1.0,
            velocity: Complex64::new(0.0, 0.0),
        };
        cam.frame(HOME_CENTER, HOME_WIDTH, aspect);
        cam
    }

    pub fn reset(&mut self, aspect: f64) {
        *self = Self::home(aspect);
    }

    pub fn top_left(&self) -> Complex64 {
        self.top_left
    }

    pub fn bottom_right(&self) -> Complex64 {
        self.bottom_right
    }

    pub fn center(&self) -> Complex64 {
        (self.top_left + self.bottom_right) * 0.5
    }

    /// `(width, height)` of the view in fractal units.
    pub fn extent(&self) -> (f64, f64) {
        (
            self.bottom_right.re - self.top_left.re,
            self.top_left.im - self.bottom_right.im,
        )
    }

    pub fn width(&self) -> f64 {
        self.extent().0
    }

    /// Magnification relative to the home view.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn velocity(&self) -> Complex64 {
        self.velocity
    }

    pub fn add_velocity(&mut self, dv: Complex64) {
        self.velocity += dv;
    }

    /// Keeps center and width; the height follows the window aspect.
    pub fn set_aspect(&mut self, aspect: f64) {
        let center = self.center();
        let width = self.width();
        self.frame(center, width, aspect);
    }

    /// Scales the view by `factor` (> 1 zooms in) about `anchor`, which stays
    /// at the same screen position. The resulting zoom is clamped.
    pub fn zoom_at(&mut self, factor: f64, anchor: Complex64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let applied = zoom / self.zoom;
        if applied == 1.0 {
            return;
        }
        self.top_left = anchor + (self.top_left - anchor) / applied;
        self.bottom_right = anchor + (self.bottom_right - anchor) / applied;
        self.zoom = zoom;
    }

    pub fn zoom_at_center(&mut self, factor: f64) {
        let center = self.center();
        self.zoom_at(factor, center);
    }

    pub fn pan_by(&mut self, delta: Complex64) {
        self.top_left += delta;
        self.bottom_right += delta;
    }

    /// Integrates the pan velocity over `dt` seconds, then damps it.
    pub fn step(&mut self, dt: f64) {
        if self.velocity.norm_sqr() == 0.0 || dt <= 0.0 {
            return;
        }
        let delta = self.velocity * (self.width() * dt);
        self.pan_by(delta);

        self.velocity *= (-DAMPING * dt).exp();
        if self.velocity.norm() < REST_SPEED {
            self.velocity = Complex64::new(0.0, 0.0);
        }
    }

    /// Maps a screen position (origin top-left, y down) to fractal space.
    pub fn screen_to_fractal(&self, px: f64, py: f64, screen_w: f64, screen_h: f64) -> Complex64 {
        let (w, h) = self.extent();
        let u = if screen_w > 0.0 { px / screen_w } else { 0.5 };
        let v = if screen_h > 0.0 { py / screen_h } else { 0.5 };
        Complex64::new(self.top_left.re + u * w, self.top_left.im - v * h)
    }

    fn frame(&mut self, center: Complex64, width: f64, aspect: f64) {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        let half = Complex64::new(width * 0.5, width / aspect * 0.5);
        self.top_left = Complex64::new(center.re - half.re, center.im + half.im);
        self.bottom_right = Complex64::new(center.re + half.re, center.im - half.im);
    }
}
