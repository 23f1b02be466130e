//! # Input Manager
//!
//! Collects window events between frames and turns them into a
//! [`ProcessedInputState`] once per frame:
//! - Keyboard and mouse button down flags, compared against the previous frame to
//!   produce pressed/held/released transitions
//! - Raw mouse motion, summed over every motion event of the frame

use std::collections::HashMap;

use winit::{
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{MouseInput, ProcessedInputState, RawInputState};

/// Keys the viewer reacts to.
pub const KEY_CODES: [KeyCode; 10] = [
    KeyCode::KeyW,
    KeyCode::KeyS,
    KeyCode::KeyA,
    KeyCode::KeyD,
    KeyCode::Space,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Escape,
];

const MOUSE_BUTTONS: [MouseButton; 2] = [MouseButton::Left, MouseButton::Right];

/// Tracks keyboard and mouse state between frames.
pub struct InputManager {
    /// Previous state of all tracked keyboard keys
    pub keyboard_inputs_old: HashMap<KeyCode, bool>,
    /// Current state of all tracked keyboard keys
    pub keyboard_inputs_new: HashMap<KeyCode, bool>,

    /// Current state of mouse inputs
    pub mouse_inputs: MouseInput,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Creates a manager with every tracked key and button released.
    pub fn new() -> Self {
        let keyboard_inputs_old: HashMap<KeyCode, bool> =
            KEY_CODES.iter().map(|&key| (key, false)).collect();
        let keyboard_inputs_new = keyboard_inputs_old.clone();

        let mouse_button_inputs_old: HashMap<MouseButton, bool> =
            MOUSE_BUTTONS.iter().map(|&button| (button, false)).collect();
        let mouse_button_inputs_new = mouse_button_inputs_old.clone();

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
            mouse_inputs: MouseInput {
                mouse_button_inputs_old,
                mouse_button_inputs_new,
                mouse_delta: None,
            },
        }
    }

    /// Copies the current down flags into the previous-frame slots.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }

        for (button, new_state) in self.mouse_inputs.mouse_button_inputs_new.iter() {
            if let Some(old_state) = self.mouse_inputs.mouse_button_inputs_old.get_mut(button) {
                *old_state = *new_state;
            }
        }
    }

    /// Records a keyboard or mouse button event. Untracked keys are ignored.
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => self.set_key(*key, *state == ElementState::Pressed),
            WindowEvent::MouseInput { button, state, .. } => {
                if let Some(button_state) = self.mouse_inputs.mouse_button_inputs_new.get_mut(button) {
                    *button_state = *state == ElementState::Pressed;
                }
            }
            _ => {}
        }
    }

    /// Sets the current down flag of a tracked key.
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        if let Some(key_state) = self.keyboard_inputs_new.get_mut(&key) {
            *key_state = pressed;
        }
    }

    /// Adds a raw mouse motion delta to this frame's total.
    pub fn intake_mouse_motion(&mut self, delta: (f64, f64)) {
        let (x, y) = self.mouse_inputs.mouse_delta.unwrap_or((0.0, 0.0));
        self.mouse_inputs.mouse_delta = Some((x + delta.0, y + delta.1));
    }

    /// Builds the processed state from the current and previous down flags.
    pub fn create_processed_input_state(&self) -> ProcessedInputState {
        let keyboard_states = self
            .keyboard_inputs_new
            .iter()
            .map(|(key, &new_state)| {
                let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
                (*key, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        let mouse_button_states = self
            .mouse_inputs
            .mouse_button_inputs_new
            .iter()
            .map(|(button, &new_state)| {
                let old_state = self
                    .mouse_inputs
                    .mouse_button_inputs_old
                    .get(button)
                    .copied()
                    .unwrap_or(false);
                (*button, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        ProcessedInputState {
            keyboard_states,
            mouse_button_states,
            mouse_delta: self.mouse_inputs.mouse_delta,
        }
    }

    /// Returns this frame's processed input and starts the next frame.
    pub fn get_and_reset_processed_input(&mut self) -> ProcessedInputState {
        let processed_input = self.create_processed_input_state();
        self.move_old_states();
        self.mouse_inputs.mouse_delta = None;
        processed_input
    }

    /// Releases every key and button, e.g. when the window loses focus.
    ///
    /// Inputs held at that moment report `Released` on the next frame instead of
    /// staying stuck down.
    pub fn reset_inputs(&mut self) {
        self.keyboard_inputs_new.values_mut().for_each(|down| *down = false);
        self.mouse_inputs
            .mouse_button_inputs_new
            .values_mut()
            .for_each(|down| *down = false);
        self.mouse_inputs.mouse_delta = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_goes_through_pressed_held_released() {
        let mut input = InputManager::new();
        input.set_key(KeyCode::KeyW, true);
        assert_eq!(
            input.get_and_reset_processed_input().get_key_state(KeyCode::KeyW),
            RawInputState::Pressed
        );
        assert_eq!(
            input.get_and_reset_processed_input().get_key_state(KeyCode::KeyW),
            RawInputState::Held
        );
        input.set_key(KeyCode::KeyW, false);
        assert_eq!(
            input.get_and_reset_processed_input().get_key_state(KeyCode::KeyW),
            RawInputState::Released
        );
        assert_eq!(
            input.get_and_reset_processed_input().get_key_state(KeyCode::KeyW),
            RawInputState::NotPressed
        );
    }

    #[test]
    fn untracked_keys_are_ignored() {
        let mut input = InputManager::new();
        input.set_key(KeyCode::KeyQ, true);
        assert!(!input.keyboard_inputs_new.contains_key(&KeyCode::KeyQ));
    }

    #[test]
    fn mouse_motion_accumulates_within_a_frame() {
        let mut input = InputManager::new();
        input.intake_mouse_motion((3.0, -1.0));
        input.intake_mouse_motion((2.5, 4.0));
        assert_eq!(input.get_and_reset_processed_input().get_mouse_delta(), Some((5.5, 3.0)));
        assert_eq!(input.get_and_reset_processed_input().get_mouse_delta(), None);
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let mut input = InputManager::new();
        input.set_key(KeyCode::Space, true);
        input.get_and_reset_processed_input();
        input.reset_inputs();
        assert_eq!(
            input.get_and_reset_processed_input().get_key_state(KeyCode::Space),
            RawInputState::Released
        );
    }
}
