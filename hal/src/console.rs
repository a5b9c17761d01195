//! Console output abstraction

/// Text console sink
///
/// Output is fire-and-forget: the console accepts every byte it is given.
pub trait ConsoleDevice {
    /// Writes raw bytes to the console
    fn write_bytes(&mut self, bytes: &[u8]);
}

/// Console that records everything written to it
#[derive(Debug, Clone, Default)]
pub struct BufferConsole {
    output: Vec<u8>,
}

impl BufferConsole {
    /// Creates an empty console
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything written so far
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Returns the output as lossy UTF-8
    pub fn output_string(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Discards recorded output
    pub fn clear(&mut self) {
        self.output.clear();
    }
}

impl ConsoleDevice for BufferConsole {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.output.extend_from_slice(bytes);
    }
}
