//! Handler trait for logger fan-out targets

use super::{error::Result, log_level::LogLevel, message::Message};
use std::collections::HashSet;
use std::sync::Arc;

/// A destination the logger forwards every message to.
///
/// `handle` and `flush` may be called from many threads at once. The level
/// setters take `&mut self`, so filters are configured before a handler is
/// shared and can never change under a concurrent `handle`.
pub trait Handler: Send + Sync {
    /// Process one message. Messages the handler does not accept are
    /// ignored and reported as success.
    fn handle(&self, message: Arc<Message>) -> Result<()>;

    fn accepts(&self, message: &Message) -> bool;

    /// Replace the accept set wholesale. `None` clears it.
    fn set_accept_levels(&mut self, levels: Option<HashSet<LogLevel>>);

    /// Replace the skip set wholesale. `None` clears it.
    fn set_skip_levels(&mut self, levels: Option<HashSet<LogLevel>>);

    /// Export anything held back. Unbuffered handlers have nothing to do.
    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Flush and release the underlying sink
    fn close(&self) -> Result<()> {
        self.flush()
    }

    fn name(&self) -> &str;
}
