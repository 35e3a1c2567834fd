//! Keyboard and mouse input without winit types.
//!
//! The runtime feeds translated [`InputEvent`]s into [`InputState`] (what is
//! held right now) which records this frame's transitions, wheel lines and
//! drag distance into [`InputFrame`]. The frame is cleared after `on_frame`.

mod frame;
pub mod platform;
mod state;
mod types;

pub use frame::{InputFrame, PIXELS_PER_LINE};
pub use state::InputState;
pub use types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, MouseWheelDelta,
    PointerButtonEvent, PointerMoveEvent,
};
