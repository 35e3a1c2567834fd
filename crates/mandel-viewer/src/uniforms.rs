use bytemuck::{Pod, Zeroable};

use crate::camera::Camera;
use crate::orbit::{ORBIT_LEN, OrbitTracker, ReferenceOrbit};

/// Iterations at the home view.
const BASE_ITER: f64 = 128.0;
/// Extra iterations per doubling of the zoom.
const ITER_PER_OCTAVE: f64 = 48.0;
const MAX_ITER: f64 = 4096.0;

/// Per-frame shader parameters, `layout(set = 0, binding = 0)`.
///
/// Field order and padding follow the std140 `Frame` block in `frag.glsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable, PartialEq)]
pub struct FrameUniforms {
    pub screen_dim: [u32; 2],
    pub use_approx: u32,
    pub orbit_len: u32,
    pub top_left: [f32; 2],
    pub bottom_right: [f32; 2],
    pub center: [f32; 2],
    pub extent: [f32; 2],
    pub zoom: f32,
    pub max_iter: u32,
    pub _pad: [f32; 2],
}

pub const FRAME_UNIFORM_SIZE: u64 = std::mem::size_of::<FrameUniforms>() as u64;

/// `vec4 points[ORBIT_LEN]`, `layout(set = 0, binding = 1)`.
pub const ORBIT_UNIFORM_SIZE: u64 = (ORBIT_LEN * std::mem::size_of::<[f32; 4]>()) as u64;

impl FrameUniforms {
    /// `screen_dim` is the framebuffer size in physical pixels.
    pub fn new(camera: &Camera, tracker: &OrbitTracker, screen_dim: (u32, u32)) -> Self {
        let (w, h) = camera.extent();
        let center = camera.center();
        let use_approx = tracker.is_active();

        Self {
            screen_dim: [screen_dim.0, screen_dim.1],
            use_approx: u32::from(use_approx),
            orbit_len: if use_approx { tracker.orbit().len() as u32 } else { 0 },
            top_left: [camera.top_left().re as f32, camera.top_left().im as f32],
            bottom_right: [camera.bottom_right().re as f32, camera.bottom_right().im as f32],
            center: [center.re as f32, center.im as f32],
            // Not derivable from the f32 corners at deep zoom.
            extent: [w as f32, h as f32],
            zoom: camera.zoom() as f32,
            max_iter: max_iterations(camera.zoom()),
            _pad: [0.0; 2],
        }
    }
}

/// Iteration budget for a zoom level.
pub fn max_iterations(zoom: f64) -> u32 {
    let octaves = zoom.max(1.0).log2();
    (BASE_ITER + ITER_PER_OCTAVE * octaves).min(MAX_ITER) as u32
}

/// The orbit as `vec4`s (xy = z_n); always `ORBIT_LEN` entries.
pub fn orbit_points(orbit: &ReferenceOrbit) -> Vec<[f32; 4]> {
    orbit
        .points()
        .iter()
        .map(|z| [z.re as f32, z.im as f32, 0.0, 0.0])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbit::APPROX_ZOOM;
    use num_complex::Complex64;

    #[test]
    fn frame_block_is_64_bytes() {
        assert_eq!(FRAME_UNIFORM_SIZE, 64);
        assert_eq!(ORBIT_UNIFORM_SIZE, 4800);
    }

    #[test]
    fn home_view_uses_direct_iteration() {
        let cam = Camera::home(16.0 / 9.0);
        let u = FrameUniforms::new(&cam, &OrbitTracker::new(true), (1920, 1080));
        assert_eq!(u.screen_dim, [1920, 1080]);
        assert_eq!(u.use_approx, 0);
        assert_eq!(u.orbit_len, 0);
        assert_eq!(u.top_left[0], -2.25);
        assert_eq!(u.center, [-0.5, 0.0]);
        assert_eq!(u.max_iter, BASE_ITER as u32);
    }

    #[test]
    fn deep_view_reports_orbit() {
        let mut cam = Camera::home(1.0);
        cam.zoom_at(APPROX_ZOOM * 4.0, Complex64::new(-0.75, 0.1));
        let mut tracker = OrbitTracker::new(true);
        tracker.update(&cam);

        let u = FrameUniforms::new(&cam, &tracker, (800, 800));
        assert_eq!(u.use_approx, 1);
        assert_eq!(u.orbit_len as usize, tracker.orbit().len());
        assert!(u.extent[0] > 0.0 && u.extent[0] < 1e-3);
    }

    #[test]
    fn iterations_grow_with_zoom_and_cap() {
        assert_eq!(max_iterations(0.5), max_iterations(1.0));
        assert!(max_iterations(1e3) > max_iterations(1e2));
        assert_eq!(max_iterations(1e300), MAX_ITER as u32);
    }

    #[test]
    fn orbit_points_cover_every_slot() {
        let orbit = ReferenceOrbit::compute(Complex64::new(0.25, 0.5));
        let pts = orbit_points(&orbit);
        assert_eq!(pts.len(), ORBIT_LEN);
        assert_eq!(pts[0], [0.25, 0.5, 0.0, 0.0]);
        assert_eq!(bytemuck::cast_slice::<_, u8>(&pts).len() as u64, ORBIT_UNIFORM_SIZE);
    }
}
