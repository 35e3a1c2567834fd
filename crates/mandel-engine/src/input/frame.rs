use std::collections::HashSet;

use crate::coords::Vec2;

use super::types::{InputEvent, Key, MouseButton, MouseWheelDelta};

/// Logical pixels treated as one wheel line for pixel-precise scrolling.
pub const PIXELS_PER_LINE: f32 = 40.0;

/// Per-frame input deltas.
///
/// `InputState` provides the current state (held keys/buttons, pointer position).
/// `InputFrame` provides events and transition sets for the current frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    /// Keys pressed this frame.
    pub keys_pressed: HashSet<Key>,

    /// Keys released this frame.
    pub keys_released: HashSet<Key>,

    /// Mouse buttons pressed this frame.
    pub buttons_pressed: HashSet<MouseButton>,

    /// Mouse buttons released this frame.
    pub buttons_released: HashSet<MouseButton>,

    /// Vertical wheel motion this frame, in lines (positive = away from user).
    pub wheel_lines: f32,

    /// Pointer motion this frame while the left button was held, in logical pixels.
    pub drag: Vec2,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.wheel_lines = 0.0;
        self.drag = Vec2::zero();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    pub(crate) fn add_wheel(&mut self, delta: MouseWheelDelta) {
        self.wheel_lines += match delta {
            MouseWheelDelta::Line { y, .. } => y,
            MouseWheelDelta::Pixel { y, .. } => y / PIXELS_PER_LINE,
        };
    }

    /// True if `key` transitioned to pressed this frame.
    pub fn pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }
}
