//! This module provides the input system for the Chip8 emulator. It keeps
//! track of the state of all 16 keys of the hexadecimal keypad.

/// The number of keys on the keypad.
pub const KEY_COUNT: usize = 16;

/// Input system for the [`super::Chip8`].
#[derive(Clone, Copy, Default)]
pub struct Input {
    /// The current state of all 16 keys.
    state: [bool; KEY_COUNT],
}

impl Input {
    /// Creates a new [`Input`] with every key released.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the input state of the given key code.
    ///
    /// # Arguments
    ///
    /// * `key_code`: The key code of the key that was pressed or released.
    /// * `pressed`: A boolean indicating whether the key was pressed (true)
    ///              or released (false).
    ///
    /// # Panics
    ///
    /// If `key_code` is not in `0x0..=0xF`.
    pub fn update(&mut self, key_code: u8, pressed: bool) {
        self.state[usize::from(key_code)] = pressed;
    }

    /// Returns whether the given key is currently pressed, or `None` if
    /// `key_code` does not name a key.
    #[must_use]
    pub fn is_key_pressed(&self, key_code: u8) -> Option<bool> {
        self.state.get(usize::from(key_code)).copied()
    }

    /// Returns the lowest pressed key, if any.
    #[must_use]
    pub fn first_pressed(&self) -> Option<u8> {
        self.state
            .iter()
            .position(|&pressed| pressed)
            .and_then(|key| u8::try_from(key).ok())
    }
}
