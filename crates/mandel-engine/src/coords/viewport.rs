/// Drawable size of a window.
///
/// `width`/`height` are logical pixels; `physical` is the framebuffer size the
/// surface is configured with (what the shader sees as `u_screen_dim`).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub physical: (u32, u32),
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32, physical: (u32, u32)) -> Self {
        Self { width, height, physical }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width / height, or 1.0 for degenerate (minimized) windows.
    #[inline]
    pub fn aspect(self) -> f64 {
        if self.is_valid() {
            f64::from(self.width) / f64::from(self.height)
        } else {
            1.0
        }
    }
}
