//! # Log Dispatch
//!
//! A buffered, multi-destination logging library.
//!
//! A [`Logger`] fans every message out to a list of handlers. The stock
//! handler, [`BufferedHandler`], filters by severity, buffers accepted
//! messages up to a capacity and hands full batches to an [`Exporter`]:
//! a byte stream (stdout, a file, a socket) or a document store.
//!
//! ## Features
//!
//! - **Seven severities**: emergency through debug, with per-handler accept
//!   and skip sets
//! - **Batched export**: capacity-triggered or manual flush, FIFO per handler
//! - **Thread Safe**: any number of producers may log concurrently
//! - **Pluggable formats**: plain text or JSON lines
//!
//! ## Example
//!
//! ```
//! use log_dispatch::prelude::*;
//!
//! let mut logger = Logger::builder()
//!     .handler(
//!         BufferedHandler::builder(StreamExporter::stdout(SimpleFormatter::new()))
//!             .capacity(10)
//!             .skip_levels([LogLevel::Debug])
//!             .build(),
//!     )
//!     .build();
//!
//! logger.info("service started");
//! logger.info_with_context("request", LogContext::new().with_field("status", 200));
//!
//! logger.flush_all().unwrap();
//! logger.shutdown().unwrap();
//! ```

pub mod core;
pub mod exporters;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        BufferConfig, BufferedHandler, Exporter, FieldValue, Formatter, Handler, JsonFormatter,
        LogContext, LogLevel, Logger, LoggerBuilder, LoggerError, Message, Processor, Result,
        SimpleFormatter, TimestampFormat,
    };
    pub use crate::exporters::{DocumentExporter, MemoryDocumentStore, StreamExporter};
}

pub use crate::core::{
    BufferConfig, BufferedHandler, BufferedHandlerBuilder, Exporter, FieldValue, Formatter,
    Handler, HandlerMetrics, JsonFormatter, LevelFilter, LogContext, LogLevel, Logger,
    LoggerBuilder, LoggerError, LoggerMetrics, Message, Processor, Result, SimpleFormatter,
    TimestampFormat, DEFAULT_BUFFER_CAPACITY,
};
pub use crate::exporters::{DocumentExporter, DocumentStore, StreamExporter};
