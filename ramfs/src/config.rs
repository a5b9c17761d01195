//! Store configuration
//!
//! Limits and policies are plain data so a host can load them from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted `max_entries`
pub const MAX_TABLE_ENTRIES: usize = 65_536;

/// Largest accepted `log_capacity`
pub const MAX_LOG_CAPACITY: usize = 65_536;

/// Largest accepted `write_slack`, in bytes
pub const MAX_WRITE_SLACK: usize = 1 << 20;

/// Errors that can occur while loading or validating a configuration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A limit has an unusable value
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    /// The JSON could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// The configuration could not be serialized
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),
}

/// What happens to a file's previous buffer when new content is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Release the old buffer once the new one is installed
    ReleaseOnReplace,
    /// Drop the old buffer without releasing it to the allocator
    ///
    /// Reproduces the legacy kernel, whose heap never got the old buffer
    /// back. Allocator accounting grows with every write.
    LegacyLeak,
}

impl Default for WritePolicy {
    fn default() -> Self {
        WritePolicy::ReleaseOnReplace
    }
}

/// Store limits and policies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RamFsConfig {
    /// Slots in the entry table, root included
    pub max_entries: usize,
    /// Children a single directory may hold
    pub max_children: usize,
    /// Longest entry name, in characters
    pub max_name_len: usize,
    /// Extra bytes requested on every write
    pub write_slack: usize,
    /// Parent links followed when rendering a full path
    pub max_path_depth: usize,
    /// Longest rendered full path, in bytes
    pub max_path_len: usize,
    /// Entries kept by the store's logger
    pub log_capacity: usize,
    /// Old-buffer handling on write
    pub write_policy: WritePolicy,
}

impl RamFsConfig {
    /// Checks that every limit is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let nonzero = [
            ("max_entries", self.max_entries),
            ("max_children", self.max_children),
            ("max_name_len", self.max_name_len),
            ("max_path_depth", self.max_path_depth),
            ("max_path_len", self.max_path_len),
        ];
        for (field, value) in nonzero {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        // The entry table and the log ring are allocated up front.
        let bounded = [
            ("max_entries", self.max_entries, MAX_TABLE_ENTRIES),
            ("log_capacity", self.log_capacity, MAX_LOG_CAPACITY),
            ("write_slack", self.write_slack, MAX_WRITE_SLACK),
        ];
        for (field, value, limit) in bounded {
            if value > limit {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("{} exceeds the limit of {}", value, limit),
                });
            }
        }

        Ok(())
    }

    /// Parses and validates a configuration from JSON bytes
    ///
    /// Missing fields take their default values.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: RamFsConfig =
            serde_json::from_slice(bytes).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to pretty JSON bytes
    pub fn to_json(&self) -> Result<Vec<u8>, ConfigError> {
        serde_json::to_vec_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

impl Default for RamFsConfig {
    fn default() -> Self {
        Self {
            max_entries: 256,
            max_children: 16,
            max_name_len: 63,
            write_slack: 1024,
            max_path_depth: 16,
            max_path_len: 256,
            log_capacity: services_logger::DEFAULT_LOG_CAPACITY,
            write_policy: WritePolicy::ReleaseOnReplace,
        }
    }
}
