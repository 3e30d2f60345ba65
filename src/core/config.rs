//! Serializable handler configuration

use super::error::{LoggerError, Result};
use super::level_filter::LevelFilter;
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};

/// Default number of messages a buffered handler holds before exporting
pub const DEFAULT_BUFFER_CAPACITY: usize = 10;

/// Buffer and filter settings for a buffered handler
///
/// Capacity 0 and 1 both mean "export every message immediately".
///
/// # Example
///
/// ```
/// use log_dispatch::core::{BufferConfig, LogLevel};
///
/// let config = BufferConfig::from_json(
///     r#"{"capacity": 50, "skip_levels": ["DEBUG"]}"#,
/// ).unwrap();
///
/// assert_eq!(config.capacity, 50);
/// assert!(!config.level_filter().accepts_level(LogLevel::Debug));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    pub capacity: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_levels: Option<Vec<LogLevel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_levels: Option<Vec<LogLevel>>,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_BUFFER_CAPACITY,
            accept_levels: None,
            skip_levels: None,
        }
    }
}

impl BufferConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LoggerError::config("BufferConfig", e.to_string()))
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_accept_levels(mut self, levels: impl IntoIterator<Item = LogLevel>) -> Self {
        self.accept_levels = Some(levels.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_skip_levels(mut self, levels: impl IntoIterator<Item = LogLevel>) -> Self {
        self.skip_levels = Some(levels.into_iter().collect());
        self
    }

    /// Build the level filter described by this configuration
    pub fn level_filter(&self) -> LevelFilter {
        let mut filter = LevelFilter::new();
        filter.set_accept_levels(
            self.accept_levels
                .as_ref()
                .map(|levels| levels.iter().copied().collect()),
        );
        filter.set_skip_levels(
            self.skip_levels
                .as_ref()
                .map(|levels| levels.iter().copied().collect()),
        );
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BufferConfig::default();
        assert_eq!(config.capacity, DEFAULT_BUFFER_CAPACITY);
        assert!(config.accept_levels.is_none());
        assert!(config.skip_levels.is_none());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = BufferConfig::from_json("{}").unwrap();
        assert_eq!(config, BufferConfig::default());
    }

    #[test]
    fn test_accept_levels_from_json() {
        let config =
            BufferConfig::from_json(r#"{"accept_levels": ["WARNING", "ERROR"]}"#).unwrap();
        let filter = config.level_filter();

        assert!(filter.accepts_level(LogLevel::Warning));
        assert!(filter.accepts_level(LogLevel::Error));
        assert!(!filter.accepts_level(LogLevel::Info));
    }

    #[test]
    fn test_unknown_level_is_config_error() {
        let err = BufferConfig::from_json(r#"{"skip_levels": ["TRACE"]}"#).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_serialization_skips_unset_levels() {
        let json = serde_json::to_string(&BufferConfig::new().with_capacity(3)).unwrap();
        assert_eq!(json, r#"{"capacity":3}"#);
    }
}
