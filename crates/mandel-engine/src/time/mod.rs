//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the runtime:
//! - one `FrameClock` per window; call `tick()` once per presented frame
//! - an `FpsCounter` that periodically summarizes frame rate for the log

mod fps;
mod frame_clock;

pub use fps::{FpsCounter, FpsReport};
pub use frame_clock::{FrameClock, FrameTime};
