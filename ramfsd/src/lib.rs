//! # RAMFS Host Runtime
//!
//! This crate runs the RAMFS shell on a host.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: The shell only sees a keyboard and a console
//! - **Fresh state per run**: Every start begins from a root-only tree
//! - **Deterministic mode is first-class**: Scripts drive the same path as
//!   a terminal, for tests
//!
//! ## Responsibilities
//!
//! The host runtime:
//! - Loads store limits from a JSON file
//! - Feeds stdin or a script into the shell's keyboard
//! - Writes shell output to stdout

pub mod console;
pub mod runtime;

pub use console::StdoutConsole;
pub use runtime::{HostRuntime, HostRuntimeConfig, HostRuntimeError};
