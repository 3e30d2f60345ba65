//! In-memory document store

use super::document::{DocumentRecord, DocumentStore};
use crate::core::error::StoreError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

type CollectionKey = (String, String);

/// Document store kept in memory, keyed by `(database, collection)`
///
/// Clones share the same storage, so a clone kept outside the exporter can
/// inspect what was inserted.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<CollectionKey, Vec<DocumentRecord>>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records of one collection, in insertion order
    pub fn records(&self, database: &str, collection: &str) -> Vec<DocumentRecord> {
        self.collections
            .read()
            .get(&(database.to_string(), collection.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    pub fn count(&self, database: &str, collection: &str) -> usize {
        self.collections
            .read()
            .get(&(database.to_string(), collection.to_string()))
            .map_or(0, Vec::len)
    }

    pub fn total(&self) -> usize {
        self.collections.read().values().map(Vec::len).sum()
    }

    pub fn clear(&self) {
        self.collections.write().clear();
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn insert(
        &mut self,
        database: &str,
        collection: &str,
        record: DocumentRecord,
    ) -> Result<(), StoreError> {
        self.collections
            .write()
            .entry((database.to_string(), collection.to_string()))
            .or_default()
            .push(record);
        Ok(())
    }
}
