//! Host console

use hal::ConsoleDevice;
use std::io::{self, Write};

/// Console that writes to the process's stdout
#[derive(Debug, Default)]
pub struct StdoutConsole;

impl StdoutConsole {
    pub fn new() -> Self {
        Self
    }
}

impl ConsoleDevice for StdoutConsole {
    fn write_bytes(&mut self, bytes: &[u8]) {
        let mut stdout = io::stdout().lock();
        // A closed stdout leaves nothing to report to.
        let _ = stdout.write_all(bytes).and_then(|()| stdout.flush());
    }
}
