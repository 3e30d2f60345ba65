//! Message formatters
//!
//! Formatters turn a [`Message`] into the text an exporter writes:
//! - [`SimpleFormatter`]: `2025-01-08 10:30:45.123456 [INFO] Request processed`
//! - [`JsonFormatter`]: `{"timestamp":"…","level":"INFO","message":"…","context":{…}}`

use super::error::{LoggerError, Result};
use super::log_context::LogContext;
use super::log_level::LogLevel;
use super::message::Message;
use super::timestamp::TimestampFormat;
use serde::Serialize;

/// Renders a message to a single output string.
///
/// Implementations must be pure. A rendering failure is returned as an error,
/// never as an empty string.
pub trait Formatter: Send + Sync {
    fn format(&self, message: &Message) -> Result<String>;

    fn name(&self) -> &str;
}

impl<F: Formatter + ?Sized> Formatter for Box<F> {
    fn format(&self, message: &Message) -> Result<String> {
        (**self).format(message)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Plain line formatter: `{timestamp} [{level}] {text}`
#[derive(Debug, Clone, Default)]
pub struct SimpleFormatter {
    timestamp_format: TimestampFormat,
    use_colors: bool,
}

impl SimpleFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timestamp format for this formatter
    ///
    /// # Examples
    ///
    /// ```
    /// use log_dispatch::core::{SimpleFormatter, TimestampFormat};
    ///
    /// let formatter = SimpleFormatter::new()
    ///     .with_timestamp_format(TimestampFormat::Iso8601);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Colorize the level name (only with the `console` feature)
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    #[cfg(feature = "console")]
    fn level_str(&self, level: LogLevel) -> String {
        use colored::Colorize;

        if self.use_colors {
            level.to_str().color(level.color_code()).to_string()
        } else {
            level.to_str().to_string()
        }
    }

    #[cfg(not(feature = "console"))]
    fn level_str(&self, level: LogLevel) -> String {
        level.to_str().to_string()
    }
}

impl Formatter for SimpleFormatter {
    fn format(&self, message: &Message) -> Result<String> {
        Ok(format!(
            "{} [{}] {}",
            self.timestamp_format.format(&message.timestamp),
            self.level_str(message.level),
            message.text
        ))
    }

    fn name(&self) -> &str {
        "simple"
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    timestamp: String,
    level: LogLevel,
    message: &'a str,
    context: &'a LogContext,
}

/// JSON object formatter with keys `timestamp`, `level`, `message`, `context`
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    timestamp_format: TimestampFormat,
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Multi-line output. Stream sinks expect one line per message, so this
    /// is mostly useful for debugging.
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, message: &Message) -> Result<String> {
        let line = JsonLine {
            timestamp: self.timestamp_format.format(&message.timestamp),
            level: message.level,
            message: &message.text,
            context: &message.context,
        };

        let encoded = if self.pretty {
            serde_json::to_string_pretty(&line)
        } else {
            serde_json::to_string(&line)
        };

        encoded.map_err(|e| LoggerError::format("JSON", e.to_string()))
    }

    fn name(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timestamp::DATE_TIME_MICROS_FORMAT;
    use crate::core::LogContext;
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

    fn fixed_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 2)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(42)
    }

    #[test]
    fn test_simple_format() {
        let message = Message::new(LogLevel::Warning, "Disk almost full")
            .with_timestamp(fixed_timestamp());

        let line = SimpleFormatter::new().format(&message).unwrap();
        assert_eq!(line, "2024-03-09 07:05:02.000042 [WARNING] Disk almost full");
    }

    #[test]
    fn test_simple_format_ignores_context() {
        let message = Message::new(LogLevel::Info, "hello")
            .with_timestamp(fixed_timestamp())
            .with_field("user", "alice");

        let line = SimpleFormatter::new().format(&message).unwrap();
        assert!(line.ends_with("[INFO] hello"));
        assert!(!line.contains("alice"));
    }

    #[test]
    fn test_json_round_trip() {
        let context = LogContext::new()
            .with_field("request_id", "abc-123")
            .with_field("latency_ms", 42)
            .with_field("cached", false)
            .with_field("ratio", 0.25);
        let message = Message::new(LogLevel::Error, "Request failed")
            .with_timestamp(fixed_timestamp())
            .with_context(context);

        let json = JsonFormatter::new().format(&message).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        let ts = parsed["timestamp"].as_str().unwrap();
        let ts = NaiveDateTime::parse_from_str(ts, DATE_TIME_MICROS_FORMAT)
            .unwrap()
            .and_utc();
        assert_eq!(ts, message.timestamp);
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["message"], "Request failed");

        let context: LogContext = serde_json::from_value(parsed["context"].clone()).unwrap();
        assert_eq!(context, message.context);
    }

    #[test]
    fn test_json_has_exactly_four_keys() {
        let message = Message::new(LogLevel::Debug, "x");
        let json = JsonFormatter::new().format(&message).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        let mut keys: Vec<_> = parsed.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["context", "level", "message", "timestamp"]);
        assert!(parsed["context"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_json_escapes_newlines() {
        let message = Message::new(LogLevel::Info, "line one\nline two");
        let json = JsonFormatter::new().format(&message).unwrap();
        assert!(!json.contains('\n'));
    }
}
