//! Interactive line editing
//!
//! This module turns raw keyboard bytes into command lines. It keeps the
//! typed text and reports what the console should echo for each byte.

/// Input buffer size, terminator included
pub const MAX_INPUT: usize = 256;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7f;

/// What a single byte did to the line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// A printable byte was appended and should be echoed
    Echo(u8),
    /// The last byte was removed; the console should erase one cell
    Erase,
    /// Enter was pressed; the finished line is returned
    Submit(String),
    /// Nothing changed
    Ignored,
}

/// Single-line editor
///
/// Accepts printable ASCII while fewer than `MAX_INPUT - 1` bytes are
/// buffered. Backspace and DEL remove the last byte; CR or LF submit.
#[derive(Debug, Clone, Default)]
pub struct LineEditor {
    /// Typed text buffer
    text_buffer: String,
}

impl LineEditor {
    /// Creates an empty editor
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes one keyboard byte
    pub fn process_byte(&mut self, byte: u8) -> KeyOutcome {
        match byte {
            b'\n' | b'\r' => KeyOutcome::Submit(std::mem::take(&mut self.text_buffer)),
            BACKSPACE | DELETE => {
                if self.text_buffer.pop().is_some() {
                    KeyOutcome::Erase
                } else {
                    KeyOutcome::Ignored
                }
            }
            32..=126 if self.text_buffer.len() < MAX_INPUT - 1 => {
                self.text_buffer.push(char::from(byte));
                KeyOutcome::Echo(byte)
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Gets the current text buffer
    pub fn text_buffer(&self) -> &str {
        &self.text_buffer
    }

    /// Discards the current line
    pub fn clear(&mut self) {
        self.text_buffer.clear();
    }
}
