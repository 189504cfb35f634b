/// Pressed state of the hex keypad, written by the host, read by the interpreter.
#[derive(Debug, Clone, Default)]
pub struct Keypad {
    keys: [bool; 16],
}

impl Keypad {
    pub fn new() -> Self {
        Self { keys: [false; 16] }
    }

    pub fn reset(&mut self) {
        self.keys = [false; 16];
    }

    pub fn press(&mut self, key: u8) {
        self.keys[(key & 0xF) as usize] = true;
    }

    pub fn release(&mut self, key: u8) {
        self.keys[(key & 0xF) as usize] = false;
    }

    pub fn set_all(&mut self, keys: [bool; 16]) {
        self.keys = keys;
    }

    // only the low nibble of a register selects a key
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&down| down).map(|k| k as u8)
    }
}

#[cfg(feature = "frontend")]
pub use host::{poll_keys, Control};

#[cfg(feature = "frontend")]
mod host {
    use minifb::{Key, KeyRepeat, Window};

    use super::Keypad;

    /// Host-only keys that drive the run-state controller.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Control {
        Quit,
        TogglePause,
        Reset,
    }

    /// ```text
    /// |1|2|3|C|      |1|2|3|4|
    /// |4|5|6|D|  ->  |Q|W|E|R|
    /// |7|8|9|E|  ->  |A|S|D|F|
    /// |A|0|B|F|      |Z|X|C|V|
    /// ```
    fn key_to_num(key: Key) -> Option<u8> {
        match key {
            Key::Key1 => Some(0x1),
            Key::Key2 => Some(0x2),
            Key::Key3 => Some(0x3),
            Key::Key4 => Some(0xC),
            Key::Q => Some(0x4),
            Key::W => Some(0x5),
            Key::E => Some(0x6),
            Key::R => Some(0xD),
            Key::A => Some(0x7),
            Key::S => Some(0x8),
            Key::D => Some(0x9),
            Key::F => Some(0xE),
            Key::Z => Some(0xA),
            Key::X => Some(0x0),
            Key::C => Some(0xB),
            Key::V => Some(0xF),
            _ => None,
        }
    }

    /// Refreshes `keypad` from the window's held keys and returns any control keys hit.
    pub fn poll_keys(window: &Window, keypad: &mut Keypad) -> Vec<Control> {
        let mut held = [false; 16];
        for key in window.get_keys() {
            if let Some(k) = key_to_num(key) {
                held[k as usize] = true;
            }
        }
        keypad.set_all(held);

        let mut controls = vec![];
        if !window.is_open() || window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            controls.push(Control::Quit);
        }
        if window.is_key_pressed(Key::Space, KeyRepeat::No) {
            controls.push(Control::TogglePause);
        }
        if window.is_key_pressed(Key::Equal, KeyRepeat::No) {
            controls.push(Control::Reset);
        }
        controls
    }
}
