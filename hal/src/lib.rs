//! # Hardware Abstraction Layer (HAL)
//!
//! This crate defines the hardware-facing traits the store and its
//! collaborators consume.
//!
//! ## Design Principles
//!
//! 1. **Trait-based**: The allocator, keyboard and console are all traits
//! 2. **Testable**: Every trait ships with an in-memory implementation

pub mod console;
pub mod keyboard;
pub mod memory;

pub use console::{BufferConsole, ConsoleDevice};
pub use keyboard::{KeyboardDevice, ScriptedKeyboard};
pub use memory::{Buffer, BufferHandle, HeapAllocator, MemoryError, MemoryHal, MemoryStats};
