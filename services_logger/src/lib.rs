//! # Logger Service
//!
//! This crate implements structured logging for the store and its shell.
//!
//! ## Philosophy
//!
//! Logging is explicit and structured, not text-based or printf-style. Every
//! store owns its own [`Logger`]; there is no global log.

use core_types::StoreId;
use std::collections::VecDeque;
use std::fmt;

/// Default number of entries kept by a [`Logger`]
pub const DEFAULT_LOG_CAPACITY: usize = 256;

/// Longest component name kept in an entry
pub const MAX_COMPONENT_LEN: usize = 31;

/// Longest message kept in an entry
pub const MAX_MESSAGE_LEN: usize = 127;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
    /// Failures that leave a subsystem unusable
    Critical,
}

impl LogLevel {
    /// Short label used when rendering
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRIT",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A structured log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Source store (if known)
    pub source: Option<StoreId>,
    /// Subsystem that produced the entry
    pub component: String,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: Vec<(String, String)>,
    /// Position in the logger's history, assigned on record
    pub sequence: u64,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: LogLevel, component: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            source: None,
            component: component.to_string(),
            message: message.into(),
            fields: Vec::new(),
            sequence: 0,
        }
    }

    /// Sets the source store
    pub fn with_source(mut self, source: StoreId) -> Self {
        self.source = Some(source);
        self
    }

    /// Adds a field to the log entry
    pub fn with_field(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.fields.push((key.to_string(), value.to_string()));
        self
    }

    /// Looks up a field by key
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.level)?;
        if !self.component.is_empty() {
            write!(f, "{}: ", self.component)?;
        }
        f.write_str(&self.message)?;
        for (key, value) in &self.fields {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

/// Bounded in-memory log
///
/// Keeps the most recent `capacity` entries; older entries are overwritten.
#[derive(Debug, Clone)]
pub struct Logger {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    enabled: bool,
    min_level: LogLevel,
    next_sequence: u64,
}

impl Logger {
    /// Creates a logger that keeps at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            capacity,
            enabled: true,
            min_level: LogLevel::Debug,
            next_sequence: 0,
        }
    }

    /// Records an entry, evicting the oldest one when full
    ///
    /// Component and message are truncated to their fixed limits.
    pub fn record(&mut self, mut entry: LogEntry) {
        if !self.enabled || entry.level < self.min_level || self.capacity == 0 {
            return;
        }

        truncate_chars(&mut entry.component, MAX_COMPONENT_LEN);
        truncate_chars(&mut entry.message, MAX_MESSAGE_LEN);
        entry.sequence = self.next_sequence;
        self.next_sequence += 1;

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Records a debug message
    pub fn debug(&mut self, component: &str, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Debug, component, message));
    }

    /// Records an informational message
    pub fn info(&mut self, component: &str, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Info, component, message));
    }

    /// Records a warning
    pub fn warn(&mut self, component: &str, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Warn, component, message));
    }

    /// Records an error
    pub fn error(&mut self, component: &str, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Error, component, message));
    }

    /// Enables or disables recording
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Drops entries below `level` from now on
    pub fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Iterates entries from oldest to newest
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Returns the most recent entry
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is held
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discards every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Renders every entry as one line, oldest first
    pub fn render(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.to_string()).collect()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

fn truncate_chars(text: &mut String, max_chars: usize) {
    if let Some((idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Critical);
    }

    #[test]
    fn test_log_entry_creation() {
        let entry = LogEntry::new(LogLevel::Info, "ramfs", "test message");
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.component, "ramfs");
        assert_eq!(entry.message, "test message");
        assert!(entry.source.is_none());
        assert!(entry.fields.is_empty());
    }

    #[test]
    fn test_log_entry_with_source() {
        let store = StoreId::new();
        let entry = LogEntry::new(LogLevel::Info, "ramfs", "test").with_source(store);
        assert_eq!(entry.source, Some(store));
    }

    #[test]
    fn test_log_entry_with_fields() {
        let entry = LogEntry::new(LogLevel::Info, "ramfs", "test")
            .with_field("id", 3)
            .with_field("name", "a.txt");

        assert_eq!(entry.fields.len(), 2);
        assert_eq!(entry.field("id"), Some("3"));
        assert_eq!(entry.field("name"), Some("a.txt"));
        assert_eq!(entry.field("missing"), None);
    }

    #[test]
    fn test_log_entry_render() {
        let entry = LogEntry::new(LogLevel::Warn, "ramfs", "directory full").with_field("dir", 0);
        assert_eq!(entry.to_string(), "[WARN] ramfs: directory full dir=0");

        let bare = LogEntry::new(LogLevel::Info, "", "boot");
        assert_eq!(bare.to_string(), "[INFO] boot");
    }

    #[test]
    fn test_logger_ring_buffer_evicts_oldest() {
        let mut logger = Logger::new(3);
        for i in 0..5 {
            logger.info("test", format!("message {}", i));
        }

        assert_eq!(logger.len(), 3);
        let messages: Vec<&str> = logger.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["message 2", "message 3", "message 4"]);
        assert_eq!(logger.last().unwrap().sequence, 4);
    }

    #[test]
    fn test_logger_disabled_and_min_level() {
        let mut logger = Logger::default();
        logger.set_enabled(false);
        logger.info("test", "dropped");
        assert!(logger.is_empty());

        logger.set_enabled(true);
        logger.set_min_level(LogLevel::Warn);
        logger.debug("test", "dropped");
        logger.warn("test", "kept");
        logger.error("test", "kept too");
        assert_eq!(logger.len(), 2);
    }

    #[test]
    fn test_logger_truncates_component_and_message() {
        let mut logger = Logger::default();
        logger.info(&"c".repeat(40), "m".repeat(200));

        let entry = logger.last().unwrap();
        assert_eq!(entry.component.len(), MAX_COMPONENT_LEN);
        assert_eq!(entry.message.len(), MAX_MESSAGE_LEN);
    }

    #[test]
    fn test_large_capacity_grows_on_demand() {
        let mut logger = Logger::new(usize::MAX);
        logger.info("test", "one");
        logger.info("test", "two");
        assert_eq!(logger.len(), 2);
    }

    #[test]
    fn test_logger_clear() {
        let mut logger = Logger::default();
        logger.info("test", "one");
        logger.clear();
        assert!(logger.is_empty());
        assert!(logger.render().is_empty());
    }
}
