//! Dispatching logger
//!
//! A `Logger` owns an ordered list of handlers and forwards every message to
//! each of them. Handler failures on the logging path are reported on stderr
//! and counted, never returned to the caller; `flush_all` is where delivery
//! errors surface.

use super::{
    error::{LoggerError, Result},
    handler::Handler,
    log_context::LogContext,
    log_level::LogLevel,
    message::Message,
    metrics::LoggerMetrics,
};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Alert on the first swallowed error and every this-many thereafter
const ALERT_INTERVAL: u64 = 1000;

pub struct Logger {
    handlers: Vec<Box<dyn Handler>>,
    /// Metrics for observability (swallowed errors, total logged, etc.)
    metrics: LoggerMetrics,
    closed: bool,
}

impl Logger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            metrics: LoggerMetrics::new(),
            closed: false,
        }
    }

    pub fn add_handler<H: Handler + 'static>(&mut self, handler: H) -> &mut Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn add_boxed_handler(&mut self, handler: Box<dyn Handler>) -> &mut Self {
        self.handlers.push(handler);
        self
    }

    /// Replace the handler list. The previous handlers are flushed and closed
    /// before they are dropped.
    pub fn set_handlers(&mut self, handlers: Vec<Box<dyn Handler>>) -> &mut Self {
        let previous = std::mem::replace(&mut self.handlers, handlers);
        for handler in &previous {
            if let Err(e) = handler.close() {
                eprintln!(
                    "[LOGGER ERROR] Handler '{}' failed to close on replacement: {}",
                    handler.name(),
                    e
                );
            }
        }
        self
    }

    pub fn handlers(&self) -> &[Box<dyn Handler>] {
        &self.handlers
    }

    /// Mutable access, e.g. to change a handler's level sets
    pub fn handlers_mut(&mut self) -> &mut [Box<dyn Handler>] {
        &mut self.handlers
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn log(&self, level: LogLevel, text: impl Into<String>) {
        self.log_message(Message::new(level, text));
    }

    /// Log with structured fields. The context is moved into the message, so
    /// later changes by the caller cannot reach a buffered copy.
    pub fn log_with_context(&self, level: LogLevel, text: impl Into<String>, context: LogContext) {
        self.log_message(Message::new(level, text).with_context(context));
    }

    /// Dispatch a prebuilt message to every handler, in registration order.
    /// Messages logged after [`Logger::shutdown`] are discarded.
    pub fn log_message(&self, message: Message) {
        if self.closed {
            return;
        }
        self.metrics.record_logged();
        let message = Arc::new(message);

        for handler in &self.handlers {
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| handler.handle(Arc::clone(&message))));

            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => self.report_handler_error(handler.name(), &e),
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    self.report_handler_error(
                        handler.name(),
                        &LoggerError::other(format!("handler panicked: {}", panic_msg)),
                    );
                }
            }
        }
    }

    fn report_handler_error(&self, name: &str, error: &LoggerError) {
        let previous = self.metrics.record_handler_error();

        if previous == 0 || (previous + 1) % ALERT_INTERVAL == 0 {
            eprintln!(
                "[LOGGER ERROR] Handler '{}' failed: {} ({} handler errors so far)",
                name,
                error,
                previous + 1
            );
        }
    }

    /// Flush every handler, continuing past failures.
    ///
    /// Returns the first error met, after all handlers were attempted.
    pub fn flush_all(&self) -> Result<()> {
        let mut first_error = None;

        for handler in &self.handlers {
            if let Err(e) = handler.flush() {
                self.metrics.record_flush_error();
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Same as [`Logger::flush_all`]
    #[inline]
    pub fn export_buffered_messages(&self) -> Result<()> {
        self.flush_all()
    }

    /// Flush and close every handler. Only the first call does any work.
    ///
    /// # Example
    ///
    /// ```
    /// use log_dispatch::core::{BufferedHandler, Logger, SimpleFormatter};
    /// use log_dispatch::exporters::StreamExporter;
    ///
    /// let mut logger = Logger::builder()
    ///     .handler(BufferedHandler::new(
    ///         StreamExporter::new(Vec::new(), SimpleFormatter::new()),
    ///         100,
    ///     ))
    ///     .build();
    /// logger.info("about to exit");
    ///
    /// logger.shutdown().unwrap();
    /// assert!(logger.is_closed());
    /// ```
    pub fn shutdown(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let mut first_error = None;
        for handler in &self.handlers {
            if let Err(e) = handler.close() {
                self.metrics.record_flush_error();
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    #[inline]
    pub fn emergency(&self, text: impl Into<String>) {
        self.log(LogLevel::Emergency, text);
    }

    #[inline]
    pub fn critical(&self, text: impl Into<String>) {
        self.log(LogLevel::Critical, text);
    }

    #[inline]
    pub fn error(&self, text: impl Into<String>) {
        self.log(LogLevel::Error, text);
    }

    #[inline]
    pub fn warning(&self, text: impl Into<String>) {
        self.log(LogLevel::Warning, text);
    }

    #[inline]
    pub fn notice(&self, text: impl Into<String>) {
        self.log(LogLevel::Notice, text);
    }

    #[inline]
    pub fn info(&self, text: impl Into<String>) {
        self.log(LogLevel::Info, text);
    }

    #[inline]
    pub fn debug(&self, text: impl Into<String>) {
        self.log(LogLevel::Debug, text);
    }

    pub fn emergency_with_context(&self, text: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Emergency, text, context);
    }

    pub fn critical_with_context(&self, text: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Critical, text, context);
    }

    pub fn error_with_context(&self, text: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Error, text, context);
    }

    pub fn warning_with_context(&self, text: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Warning, text, context);
    }

    pub fn notice_with_context(&self, text: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Notice, text, context);
    }

    pub fn info_with_context(&self, text: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Info, text, context);
    }

    pub fn debug_with_context(&self, text: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Debug, text, context);
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        let errors = self.metrics.handler_errors();
        if errors > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down after {} swallowed handler errors",
                errors
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use log_dispatch::prelude::*;
///
/// let logger = Logger::builder()
///     .handler(
///         BufferedHandler::builder(StreamExporter::stderr(SimpleFormatter::new()))
///             .skip_levels([LogLevel::Debug])
///             .build(),
///     )
///     .build();
/// assert_eq!(logger.handler_count(), 1);
/// ```
#[derive(Default)]
pub struct LoggerBuilder {
    handlers: Vec<Box<dyn Handler>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn handler<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn boxed_handler(mut self, handler: Box<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn build(self) -> Logger {
        let mut logger = Logger::new();
        logger.handlers = self.handlers;
        logger
    }
}
