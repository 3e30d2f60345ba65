//! Document-store exporter
//!
//! Each message becomes one record inserted into a named collection:
//!
//! ```json
//! {"timestamp": "2025-01-08 10:30:45", "level": "INFO", "message": "…", "context": {…}}
//! ```
//!
//! The record layout is what existing stored logs use, so it must not drift.

use crate::core::{
    error::StoreError, Exporter, LogContext, LogLevel, LoggerError, Message, Result,
    TimestampFormat,
};
use serde::{Deserialize, Serialize};

/// Stored form of a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Second precision, `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    pub context: LogContext,
}

impl DocumentRecord {
    pub fn from_message(message: &Message) -> Self {
        Self {
            timestamp: TimestampFormat::DateTime.format(&message.timestamp),
            level: message.level,
            message: message.text.clone(),
            context: message.context.clone(),
        }
    }
}

impl From<&Message> for DocumentRecord {
    fn from(message: &Message) -> Self {
        Self::from_message(message)
    }
}

/// A database that accepts inserts into named collections
pub trait DocumentStore: Send {
    fn insert(
        &mut self,
        database: &str,
        collection: &str,
        record: DocumentRecord,
    ) -> std::result::Result<(), StoreError>;

    /// Make previous inserts durable, if the store buffers them
    fn flush(&mut self) -> std::result::Result<(), StoreError> {
        Ok(())
    }
}

impl<S: DocumentStore + ?Sized> DocumentStore for Box<S> {
    fn insert(
        &mut self,
        database: &str,
        collection: &str,
        record: DocumentRecord,
    ) -> std::result::Result<(), StoreError> {
        (**self).insert(database, collection, record)
    }

    fn flush(&mut self) -> std::result::Result<(), StoreError> {
        (**self).flush()
    }
}

/// Exporter inserting each message into `database.collection`
///
/// # Example
///
/// ```
/// use log_dispatch::core::{BufferedHandler, Handler, LogLevel, Message};
/// use log_dispatch::exporters::{DocumentExporter, MemoryDocumentStore};
/// use std::sync::Arc;
///
/// let store = MemoryDocumentStore::new();
/// let handler = BufferedHandler::new(DocumentExporter::new(store.clone(), "app", "logs"), 1);
///
/// handler.handle(Arc::new(Message::new(LogLevel::Error, "payment failed"))).unwrap();
/// assert_eq!(store.records("app", "logs")[0].message, "payment failed");
/// ```
pub struct DocumentExporter<S: DocumentStore> {
    store: S,
    database: String,
    collection: String,
    name: String,
}

impl<S: DocumentStore> DocumentExporter<S> {
    pub fn new(store: S, database: impl Into<String>, collection: impl Into<String>) -> Self {
        let database = database.into();
        let collection = collection.into();
        let name = format!("{}.{}", database, collection);

        Self {
            store,
            database,
            collection,
            name,
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: DocumentStore> Exporter for DocumentExporter<S> {
    fn export_message(&mut self, message: &Message) -> Result<()> {
        self.store
            .insert(
                &self.database,
                &self.collection,
                DocumentRecord::from_message(message),
            )
            .map_err(|e| LoggerError::sink_insert(&self.name, e))
    }

    fn flush(&mut self) -> Result<()> {
        self.store
            .flush()
            .map_err(|e| LoggerError::sink_insert(&self.name, e))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
