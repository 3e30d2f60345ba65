//! Exporter implementations
//!
//! An exporter writes one message at a time to a destination. Buffering,
//! filtering and batching live in [`BufferedHandler`](crate::core::BufferedHandler),
//! so exporters stay small.

pub mod document;
pub mod file;
pub mod jsonl_store;
pub mod memory_store;
pub mod stream;

pub use crate::core::Exporter;
pub use document::{DocumentExporter, DocumentRecord, DocumentStore};
pub use file::FileSink;
pub use jsonl_store::JsonLinesStore;
pub use memory_store::MemoryDocumentStore;
pub use stream::{ClosableSink, StreamExporter};
