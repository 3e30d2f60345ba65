//! Message processors applied by handlers before buffering
//!
//! A processor is a total `Message -> Message` transform. It cannot fail: a
//! processor that needs to reject something should tag or rewrite the
//! message instead.

use super::log_context::{FieldValue, LogContext};
use super::message::Message;
use std::collections::HashSet;

pub trait Processor: Send + Sync {
    fn process(&self, message: Message) -> Message;

    fn name(&self) -> &str {
        "processor"
    }
}

impl<F> Processor for F
where
    F: Fn(Message) -> Message + Send + Sync,
{
    fn process(&self, message: Message) -> Message {
        self(message)
    }

    fn name(&self) -> &str {
        "fn"
    }
}

/// Replaces the values of sensitive context keys
///
/// # Example
///
/// ```
/// use log_dispatch::core::{LogLevel, Message, Processor, RedactFields};
///
/// let redact = RedactFields::new(["password"]);
/// let message = redact.process(
///     Message::new(LogLevel::Info, "login").with_field("password", "hunter2"),
/// );
/// assert_eq!(message.context.get("password").unwrap().to_string(), "[REDACTED]");
/// ```
#[derive(Debug, Clone)]
pub struct RedactFields {
    keys: HashSet<String>,
    replacement: String,
}

impl RedactFields {
    pub const DEFAULT_REPLACEMENT: &'static str = "[REDACTED]";

    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            replacement: Self::DEFAULT_REPLACEMENT.to_string(),
        }
    }

    #[must_use]
    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = replacement.into();
        self
    }
}

impl Processor for RedactFields {
    fn process(&self, mut message: Message) -> Message {
        for key in &self.keys {
            if message.context.get(key).is_some() {
                message
                    .context
                    .add_field(key.clone(), self.replacement.as_str());
            }
        }
        message
    }

    fn name(&self) -> &str {
        "redact_fields"
    }
}

/// Adds fixed fields (service name, host, version) to every message
///
/// Fields already present on the message take priority.
#[derive(Debug, Clone, Default)]
pub struct StaticFields {
    fields: LogContext,
}

impl StaticFields {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.add_field(key, value);
        self
    }
}

impl Processor for StaticFields {
    fn process(&self, mut message: Message) -> Message {
        for (key, value) in self.fields.fields() {
            if message.context.get(key).is_none() {
                message.context.add_field(key.clone(), value.clone());
            }
        }
        message
    }

    fn name(&self) -> &str {
        "static_fields"
    }
}
