//! Core logger types and traits

pub mod buffered_handler;
pub mod config;
pub mod error;
pub mod exporter;
pub mod formatter;
pub mod handler;
pub mod level_filter;
pub mod log_context;
pub mod log_level;
pub mod logger;
pub mod message;
pub mod metrics;
pub mod processor;
pub mod timestamp;

pub use buffered_handler::{BufferedHandler, BufferedHandlerBuilder};
pub use config::{BufferConfig, DEFAULT_BUFFER_CAPACITY};
pub use error::{LoggerError, Result, StoreError};
pub use exporter::Exporter;
pub use formatter::{Formatter, JsonFormatter, SimpleFormatter};
pub use handler::Handler;
pub use level_filter::LevelFilter;
pub use log_context::{FieldValue, LogContext};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use message::Message;
pub use metrics::{HandlerMetrics, LoggerMetrics};
pub use processor::{Processor, RedactFields, StaticFields};
pub use timestamp::{TimestampFormat, DATE_TIME_FORMAT, DATE_TIME_MICROS_FORMAT};
