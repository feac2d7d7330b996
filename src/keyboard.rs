use std::fmt::Display;

pub const KEY_COUNT: usize = 16;

/// Snapshot of the hexadecimal keypad, keys 0x0 to 0xF. The caller refreshes it before each
/// cycle; the interpreter only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pressed_keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the low nibble of `key` selects a key.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.pressed_keys[usize::from(key & 0xF)]
    }

    pub fn press_key(&mut self, key: u8) {
        self.pressed_keys[usize::from(key & 0xF)] = true;
    }

    pub fn release_key(&mut self, key: u8) {
        self.pressed_keys[usize::from(key & 0xF)] = false;
    }

    pub fn set_state(&mut self, pressed_keys: [bool; KEY_COUNT]) {
        self.pressed_keys = pressed_keys;
    }

    pub fn state(&self) -> [bool; KEY_COUNT] {
        self.pressed_keys
    }
}

impl Display for Keyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pressed_keys.iter().map(|k| if *k { "o" } else { " " }).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pressed() {
        let mut keyboard = Keyboard::new();

        let key: u8 = 0x4;
        keyboard.pressed_keys[key as usize] = true;

        assert!(keyboard.is_pressed(key));
        assert!(!keyboard.is_pressed(0x5));
    }

    #[test]
    fn test_press_release() {
        let mut keyboard = Keyboard::new();

        keyboard.press_key(0xA);
        assert!(keyboard.pressed_keys[0xA]);

        keyboard.release_key(0xA);
        assert!(!keyboard.pressed_keys[0xA]);
    }

    #[test]
    fn test_key_uses_low_nibble() {
        let mut keyboard = Keyboard::new();

        keyboard.press_key(0x1B);

        assert!(keyboard.is_pressed(0xB));
    }

    #[test]
    fn test_set_state() {
        let mut keyboard = Keyboard::new();
        let mut state = [false; KEY_COUNT];
        state[0x3] = true;
        state[0xF] = true;

        keyboard.set_state(state);
        assert_eq!(keyboard.state(), state);
        assert_eq!(keyboard.to_string(), "   o           o");

        keyboard.set_state([false; KEY_COUNT]);

        for key in 0..16 {
            assert!(!keyboard.is_pressed(key));
        }
    }
}
