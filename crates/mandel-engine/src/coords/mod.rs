//! Screen-space value types.
//!
//! Screen space is in logical pixels with the origin at the top-left and y
//! pointing down. Fractal space lives in the viewer, not here.

mod color;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use vec2::Vec2;
pub use viewport::Viewport;
