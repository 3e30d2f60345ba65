//! Exporter trait for log output destinations

use super::{error::Result, message::Message};

/// Writes single messages to a sink.
///
/// Exporters hold no buffering logic of their own; the buffered handler owns
/// the queue and calls `export_message` once per message, in order, followed
/// by `flush` at the end of each batch. Calls are never concurrent for one
/// exporter instance.
pub trait Exporter: Send {
    fn export_message(&mut self, message: &Message) -> Result<()>;

    /// Push any bytes held by the sink. Called after every batch.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Release the sink. Called at most once, at shutdown.
    fn close(&mut self) -> Result<()> {
        self.flush()
    }

    fn name(&self) -> &str;
}

impl<E: Exporter + ?Sized> Exporter for Box<E> {
    fn export_message(&mut self, message: &Message) -> Result<()> {
        (**self).export_message(message)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
