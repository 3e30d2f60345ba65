//! Error types for the log dispatch system

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Boxed error returned by document stores
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Formatter failed to render a message
    #[error("Formatter error ({format_type}): {message}")]
    Format {
        format_type: String,
        message: String,
    },

    /// Byte-stream sink rejected a write or flush
    #[error("Write to sink '{sink}' failed: {source}")]
    SinkWrite {
        sink: String,
        #[source]
        source: std::io::Error,
    },

    /// Document store rejected an insert
    #[error("Insert into collection '{collection}' failed: {source}")]
    SinkInsert {
        collection: String,
        #[source]
        source: StoreError,
    },

    /// Export attempted on a sink that was already closed
    #[error("Sink '{sink}' is closed")]
    SinkClosed { sink: String },

    /// File lock error
    #[error("Failed to acquire file lock on '{path}'")]
    FileLockError { path: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create a formatter error
    pub fn format(format_type: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Format {
            format_type: format_type.into(),
            message: message.into(),
        }
    }

    /// Create a stream sink write error
    pub fn sink_write(sink: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::SinkWrite {
            sink: sink.into(),
            source,
        }
    }

    /// Create a document store insert error
    pub fn sink_insert(collection: impl Into<String>, source: impl Into<StoreError>) -> Self {
        LoggerError::SinkInsert {
            collection: collection.into(),
            source: source.into(),
        }
    }

    /// Create a closed sink error
    pub fn sink_closed(sink: impl Into<String>) -> Self {
        LoggerError::SinkClosed { sink: sink.into() }
    }

    /// Create a file lock error
    pub fn file_lock(path: impl Into<String>) -> Self {
        LoggerError::FileLockError { path: path.into() }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Whether the error came from the sink side of an export
    pub fn is_sink_error(&self) -> bool {
        matches!(
            self,
            LoggerError::SinkWrite { .. }
                | LoggerError::SinkInsert { .. }
                | LoggerError::SinkClosed { .. }
        )
    }
}
