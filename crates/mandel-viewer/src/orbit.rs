//! Reference orbit for the perturbation approximation.
//!
//! Past [`APPROX_ZOOM`] neighbouring pixels differ by less than f32 can
//! resolve, so the shader iterates only the small offset `d` from one orbit
//! computed here in f64 at the view center.

use num_complex::Complex64;

use crate::camera::Camera;

/// Number of orbit points uploaded to the shader.
pub const ORBIT_LEN: usize = 300;
/// Escape radius squared.
pub const BAILOUT: f64 = 4.0;
/// Zoom at which the shader switches to the reference orbit.
pub const APPROX_ZOOM: f64 = 1e4;

#[derive(Debug, Clone)]
pub struct ReferenceOrbit {
    points: [Complex64; ORBIT_LEN],
    len: usize,
}

impl ReferenceOrbit {
    /// Iterates `z_0 = c`, `z_{n+1} = z_n^2 + c`. The first escaping point is
    /// kept and ends the orbit; unused slots are zero.
    pub fn compute(c: Complex64) -> Self {
        let mut points = [Complex64::new(0.0, 0.0); ORBIT_LEN];
        let mut z = c;
        let mut len = 0;

        for slot in points.iter_mut() {
            *slot = z;
            len += 1;
            if z.norm_sqr() > BAILOUT {
                break;
            }
            z = z * z + c;
        }

        Self { points, len }
    }

    /// The point the orbit is anchored at.
    pub fn center(&self) -> Complex64 {
        self.points[0]
    }

    /// Number of valid points; always at least 1.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// All `ORBIT_LEN` slots, including the zeroed tail.
    pub fn points(&self) -> &[Complex64; ORBIT_LEN] {
        &self.points
    }
}

/// Keeps the reference orbit in step with the camera.
#[derive(Debug, Clone)]
pub struct OrbitTracker {
    orbit: ReferenceOrbit,
    enabled: bool,
    active: bool,
    generation: u64,
}

impl OrbitTracker {
    pub fn new(enabled: bool) -> Self {
        Self {
            orbit: ReferenceOrbit::compute(Complex64::new(0.0, 0.0)),
            enabled,
            active: false,
            generation: 0,
        }
    }

    /// Recomputes the orbit when the zoom crosses [`APPROX_ZOOM`] upward, and
    /// while above it whenever the center moves. Returns true on recompute.
    pub fn update(&mut self, camera: &Camera) -> bool {
        let wanted = self.enabled && camera.zoom() >= APPROX_ZOOM;
        let center = camera.center();

        match (self.active, wanted) {
            (false, true) => {
                self.recompute(center);
                self.active = true;
                log::debug!("perturbation on at zoom {:.3e}", camera.zoom());
                true
            }
            (true, false) => {
                self.active = false;
                log::debug!("perturbation off at zoom {:.3e}", camera.zoom());
                false
            }
            (true, true) if self.orbit.center() != center => {
                self.recompute(center);
                true
            }
            _ => false,
        }
    }

    /// Whether the shader should use the orbit this frame.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Takes effect on the next [`update`](Self::update).
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn orbit(&self) -> &ReferenceOrbit {
        &self.orbit
    }

    /// Incremented on every recompute; lets the renderer skip re-uploads.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn recompute(&mut self, center: Complex64) {
        self.orbit = ReferenceOrbit::compute(center);
        self.generation += 1;
    }
}
