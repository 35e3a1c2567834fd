//! Window, input and GPU runtime for the Mandelbrot viewer.
//!
//! - `window` runs the winit event loop for a single window
//! - `core` is the `App` contract and the per-frame context
//! - `render` compiles GLSL programs, watches their files and draws a
//!   full-screen quad with them

pub mod coords;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
