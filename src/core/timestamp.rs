//! Timestamp formatting utilities
//!
//! The plain formatter and the document-store record both use fixed,
//! zero-padded layouts. Other layouts are available for custom formatters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// `2025-01-08 10:30:45`
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `2025-01-08 10:30:45.123456`
pub const DATE_TIME_MICROS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use log_dispatch::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let ts = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::DateTime.format(&ts), "2025-01-08 10:30:45");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Second precision: `2025-01-08 10:30:45`
    ///
    /// Used for stored document records.
    DateTime,

    /// Microsecond precision: `2025-01-08 10:30:45.123456`
    #[default]
    DateTimeMicros,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Custom strftime format. An invalid pattern falls back to
    /// `DateTimeMicros`.
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::DateTime => datetime.format(DATE_TIME_FORMAT).to_string(),
            TimestampFormat::DateTimeMicros => {
                datetime.format(DATE_TIME_MICROS_FORMAT).to_string()
            }
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Custom(format_str) => {
                let mut rendered = String::new();
                if write!(rendered, "{}", datetime.format(format_str)).is_err() {
                    return datetime.format(DATE_TIME_MICROS_FORMAT).to_string();
                }
                rendered
            }
        }
    }
}
