//! # Host Runtime
//!
//! The loop that feeds input into the shell.

use cli_console::Shell;
use hal::{ConsoleDevice, ScriptedKeyboard};
use ramfs::{ConfigError, FsError, RamFs, RamFsConfig, SharedRamFs};
use services_logger::{LogEntry, LogLevel};
use std::fs;
use std::io::BufRead;
use std::path::Path;
use thiserror::Error;

const COMPONENT: &str = "host";

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostRuntimeError {
    #[error("Store error: {0}")]
    Fs(#[from] FsError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("Input error: {0}")]
    Input(String),
}

/// Host runtime configuration
#[derive(Debug, Clone, Default)]
pub struct HostRuntimeConfig {
    /// Store limits and policies
    pub store: RamFsConfig,
    /// Optional input script; stdin is used when absent
    pub script: Option<String>,
    /// Whether the shell echoes typed input
    pub echo: bool,
}

impl HostRuntimeConfig {
    /// Loads store limits from a JSON file
    pub fn load_store_config(path: &Path) -> Result<RamFsConfig, HostRuntimeError> {
        let bytes = fs::read(path).map_err(|e| HostRuntimeError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(RamFsConfig::from_json(&bytes)?)
    }
}

/// Host runtime
pub struct HostRuntime<C> {
    /// Store shared with the shell
    fs: SharedRamFs,
    /// The shell
    shell: Shell<ScriptedKeyboard, C>,
    /// Input script (if any)
    script: Option<String>,
}

impl<C: ConsoleDevice> HostRuntime<C> {
    /// Creates a new host runtime writing to `console`
    pub fn new(config: HostRuntimeConfig, console: C) -> Result<Self, HostRuntimeError> {
        let store = RamFs::with_config(config.store)?;
        let fs = SharedRamFs::new(store);
        fs.with(|store| {
            let entry = LogEntry::new(LogLevel::Info, COMPONENT, "host started")
                .with_source(store.id())
                .with_field("scripted", config.script.is_some());
            store.log_mut().record(entry);
        });

        let mut shell = Shell::new(fs.clone(), ScriptedKeyboard::new(), console);
        shell.set_echo(config.echo);
        Ok(Self {
            fs,
            shell,
            script: config.script,
        })
    }

    /// Runs the script if one was configured, otherwise reads `input` line by
    /// line until it ends or the shell exits
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<(), HostRuntimeError> {
        self.shell.start();
        match self.script.take() {
            Some(script) => {
                self.feed(script.as_bytes());
                if self.shell.is_running() && !script.ends_with('\n') {
                    self.feed(b"\n");
                }
                Ok(())
            }
            None => self.run_interactive(input),
        }
    }

    fn run_interactive<R: BufRead>(&mut self, mut input: R) -> Result<(), HostRuntimeError> {
        let mut line = String::new();
        while self.shell.is_running() {
            line.clear();
            let read = input
                .read_line(&mut line)
                .map_err(|e| HostRuntimeError::Input(e.to_string()))?;
            if read == 0 {
                break;
            }
            self.feed(line.as_bytes());
        }
        Ok(())
    }

    /// Pushes bytes into the shell's keyboard and lets the shell consume them
    pub fn feed(&mut self, bytes: &[u8]) {
        self.shell.syscalls_mut().keyboard_mut().push_bytes(bytes);
        self.shell.pump();
    }

    /// The store
    pub fn fs(&self) -> &SharedRamFs {
        &self.fs
    }

    /// The shell
    pub fn shell(&self) -> &Shell<ScriptedKeyboard, C> {
        &self.shell
    }

    /// Exit status requested by the shell, if any
    pub fn exit_status(&self) -> Option<i32> {
        self.shell.exit_status()
    }
}
