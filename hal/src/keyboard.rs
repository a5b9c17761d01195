//! Keyboard device abstraction
//!
//! The keyboard is a poll-based byte source. Scancode translation happens
//! below this layer; callers only ever see ASCII bytes.

use std::collections::VecDeque;

/// Keyboard device trait
///
/// Architecture-specific implementations provide keyboard input via this trait.
pub trait KeyboardDevice {
    /// Polls for the next translated byte
    ///
    /// Returns `None` when no key is pending. Never blocks.
    fn poll_byte(&mut self) -> Option<u8>;
}

/// Keyboard fed from a prepared byte sequence
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeyboard {
    pending: VecDeque<u8>,
}

impl ScriptedKeyboard {
    /// Creates an empty keyboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues bytes to be returned by subsequent polls
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes.iter().copied());
    }

    /// Returns the number of bytes still pending
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl KeyboardDevice for ScriptedKeyboard {
    fn poll_byte(&mut self) -> Option<u8> {
        self.pending.pop_front()
    }
}
