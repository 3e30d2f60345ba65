//! Byte-stream exporter
//!
//! Formats each message, appends a newline, and writes it to any
//! `io::Write` sink.

use crate::core::{Exporter, Formatter, LoggerError, Message, Result};
use std::io::{self, Write};
use std::net::{Shutdown, TcpStream};
use std::path::Path;

use super::file::FileSink;

/// A writable sink that can also be closed explicitly.
///
/// Register such a sink with [`StreamExporter::with_closable`] to have it
/// closed on shutdown. Plain writers are only flushed.
pub trait ClosableSink: Write + Send {
    fn close(&mut self) -> io::Result<()>;
}

impl ClosableSink for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Both)
    }
}

enum Sink {
    Plain(Box<dyn Write + Send>),
    Closable(Box<dyn ClosableSink>),
    Closed,
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Plain(writer) => writer.write(buf),
            Sink::Closable(sink) => sink.write(buf),
            Sink::Closed => Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Plain(writer) => writer.flush(),
            Sink::Closable(sink) => sink.flush(),
            Sink::Closed => Ok(()),
        }
    }
}

/// Exporter writing one formatted line per message to a byte stream
///
/// # Example
///
/// ```
/// use log_dispatch::core::{Exporter, JsonFormatter, LogLevel, Message};
/// use log_dispatch::exporters::StreamExporter;
///
/// let mut exporter = StreamExporter::stderr(JsonFormatter::new());
/// exporter.export_message(&Message::new(LogLevel::Notice, "ready")).unwrap();
/// ```
pub struct StreamExporter {
    sink: Sink,
    formatter: Box<dyn Formatter>,
    name: String,
}

impl StreamExporter {
    /// Write to a plain writer. The writer is flushed but never closed.
    pub fn new<W, F>(writer: W, formatter: F) -> Self
    where
        W: Write + Send + 'static,
        F: Formatter + 'static,
    {
        Self {
            sink: Sink::Plain(Box::new(writer)),
            formatter: Box::new(formatter),
            name: "stream".to_string(),
        }
    }

    /// Write to a sink that is closed when the exporter is closed
    pub fn with_closable<S, F>(sink: S, formatter: F) -> Self
    where
        S: ClosableSink + 'static,
        F: Formatter + 'static,
    {
        Self {
            sink: Sink::Closable(Box::new(sink)),
            formatter: Box::new(formatter),
            name: "stream".to_string(),
        }
    }

    pub fn stdout<F: Formatter + 'static>(formatter: F) -> Self {
        Self::new(io::stdout(), formatter).with_name("stdout")
    }

    pub fn stderr<F: Formatter + 'static>(formatter: F) -> Self {
        Self::new(io::stderr(), formatter).with_name("stderr")
    }

    /// Append to a file, creating it (and its parent directories) if needed
    pub fn file<F: Formatter + 'static>(path: impl AsRef<Path>, formatter: F) -> Result<Self> {
        let sink = FileSink::new(path.as_ref())?;
        let name = sink.path().display().to_string();
        Ok(Self::with_closable(sink, formatter).with_name(name))
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    pub fn is_closable(&self) -> bool {
        matches!(self.sink, Sink::Closable(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.sink, Sink::Closed)
    }
}

impl Exporter for StreamExporter {
    fn export_message(&mut self, message: &Message) -> Result<()> {
        if self.is_closed() {
            return Err(LoggerError::sink_closed(&self.name));
        }

        let mut line = self.formatter.format(message)?;
        line.push('\n');

        self.sink
            .write_all(line.as_bytes())
            .map_err(|e| LoggerError::sink_write(&self.name, e))
    }

    fn flush(&mut self) -> Result<()> {
        self.sink
            .flush()
            .map_err(|e| LoggerError::sink_write(&self.name, e))
    }

    fn close(&mut self) -> Result<()> {
        // A closable sink is closed once, whatever the outcome
        let result = match std::mem::replace(&mut self.sink, Sink::Closed) {
            Sink::Plain(mut writer) => {
                let flushed = writer.flush();
                self.sink = Sink::Plain(writer);
                flushed
            }
            Sink::Closable(mut sink) => sink.flush().and_then(|_| sink.close()),
            Sink::Closed => Ok(()),
        };

        result.map_err(|e| LoggerError::sink_write(&self.name, e))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
