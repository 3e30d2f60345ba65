//! Log message structure

use super::log_context::{FieldValue, LogContext};
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single log message.
///
/// Messages are treated as immutable once handed to a logger. `Clone`
/// produces a fully independent copy: the context map is duplicated and
/// the timestamp is a value, so later changes to one copy never show up in
/// the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    pub context: LogContext,
}

impl Message {
    /// Create a message stamped with the current time and an empty context
    pub fn new(level: LogLevel, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level,
            timestamp: Utc::now(),
            context: LogContext::new(),
        }
    }

    /// Attach a context, replacing any existing one
    ///
    /// The context is moved in, so the message owns its own copy and cannot
    /// alias caller data.
    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.context.add_field(key, value);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
