//! # Input State
//!
//! Types describing the per-frame state of keys and mouse buttons, as handed from the
//! input manager to the engine.

use std::collections::HashMap;
use winit::{event::MouseButton, keyboard::KeyCode};

/// Represents the state of a key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawInputState {
    /// Key/button is not pressed
    #[default]
    NotPressed,
    /// Key/button was just pressed this frame
    Pressed,
    /// Key/button has been held down for multiple frames
    Held,
    /// Key/button was just released this frame
    Released,
}

impl RawInputState {
    /// Determines if the input is actively down (either pressed or held)
    pub fn is_active(&self) -> bool {
        matches!(self, RawInputState::Pressed | RawInputState::Held)
    }

    /// Determines if the input was just pressed this frame
    pub fn is_just_pressed(&self) -> bool {
        matches!(self, RawInputState::Pressed)
    }

    /// Determines if the input was just released this frame
    pub fn is_just_released(&self) -> bool {
        matches!(self, RawInputState::Released)
    }

    /// Derives the transition from the previous and current down flags
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,
            (true, true) => RawInputState::Held,
            (true, false) => RawInputState::Released,
            (false, false) => RawInputState::NotPressed,
        }
    }
}

/// A snapshot of the processed input states for one frame.
#[derive(Debug, Clone, Default)]
pub struct ProcessedInputState {
    /// Current state of all tracked keyboard keys
    pub keyboard_states: HashMap<KeyCode, RawInputState>,

    /// Current state of mouse buttons
    pub mouse_button_states: HashMap<MouseButton, RawInputState>,

    /// Mouse movement accumulated since the last frame (x, y), in pixels
    pub mouse_delta: Option<(f64, f64)>,
}

impl ProcessedInputState {
    /// Gets the state of a keyboard key
    pub fn get_key_state(&self, key: KeyCode) -> RawInputState {
        self.keyboard_states.get(&key).copied().unwrap_or_default()
    }

    /// Gets the state of a mouse button
    pub fn get_mouse_button_state(&self, button: MouseButton) -> RawInputState {
        self.mouse_button_states.get(&button).copied().unwrap_or_default()
    }

    /// Gets the mouse movement delta since the last frame
    pub fn get_mouse_delta(&self) -> Option<(f64, f64)> {
        self.mouse_delta
    }
}

/// Down flags of the mouse buttons for the previous and current frame.
#[derive(Debug, Default)]
pub struct MouseInput {
    /// Previous state of each mouse button
    pub mouse_button_inputs_old: HashMap<MouseButton, bool>,
    /// Current state of each mouse button
    pub mouse_button_inputs_new: HashMap<MouseButton, bool>,

    /// Mouse movement accumulated since the last frame (x, y)
    pub mouse_delta: Option<(f64, f64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions() {
        assert_eq!(RawInputState::from_raw_states(false, true), RawInputState::Pressed);
        assert_eq!(RawInputState::from_raw_states(true, true), RawInputState::Held);
        assert_eq!(RawInputState::from_raw_states(true, false), RawInputState::Released);
        assert_eq!(RawInputState::from_raw_states(false, false), RawInputState::NotPressed);
        assert!(RawInputState::Held.is_active());
        assert!(!RawInputState::Released.is_active());
    }

    #[test]
    fn untracked_inputs_read_as_not_pressed() {
        let state = ProcessedInputState::default();
        assert_eq!(state.get_key_state(KeyCode::KeyQ), RawInputState::NotPressed);
        assert_eq!(
            state.get_mouse_button_state(MouseButton::Middle),
            RawInputState::NotPressed
        );
        assert_eq!(state.get_mouse_delta(), None);
    }
}
