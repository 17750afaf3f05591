//! Input capability consumed by the simulation step
//!
//! The step only asks "is this logical key held right now"; platform event
//! handling lives in the frame driver.

/// Logical keys the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    MoveLeft,
    MoveRight,
    Launch,
    Quit,
}

impl Key {
    #[inline]
    const fn bit(self) -> u8 {
        1 << self as u8
    }

    /// Map a browser `KeyboardEvent.key` value
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "a" | "A" => Some(Key::MoveLeft),
            "ArrowRight" | "d" | "D" => Some(Key::MoveRight),
            " " | "Enter" => Some(Key::Launch),
            "Escape" => Some(Key::Quit),
            _ => None,
        }
    }
}

/// Key-down query
pub trait KeyInput {
    fn is_key_down(&self, key: Key) -> bool;
}

/// Held-key snapshot, updated from key-down/key-up events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    held: u8,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with exactly the given keys held
    pub fn with(keys: &[Key]) -> Self {
        let mut state = Self::new();
        for &key in keys {
            state.press(key);
        }
        state
    }

    pub fn press(&mut self, key: Key) {
        self.held |= key.bit();
    }

    pub fn release(&mut self, key: Key) {
        self.held &= !key.bit();
    }

    pub fn set(&mut self, key: Key, down: bool) {
        if down {
            self.press(key);
        } else {
            self.release(key);
        }
    }

    /// Release everything (window lost focus)
    pub fn clear(&mut self) {
        self.held = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.held == 0
    }
}

impl KeyInput for KeyState {
    #[inline]
    fn is_key_down(&self, key: Key) -> bool {
        self.held & key.bit() != 0
    }
}
