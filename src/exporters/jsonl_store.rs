//! Directory-backed document store writing JSON lines

use super::document::{DocumentRecord, DocumentStore};
use crate::core::{error::StoreError, LoggerError, Result};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Stores each collection as `<dir>/<database>.<collection>.jsonl`
///
/// Every record is one JSON object per line (JSONL), which log aggregation
/// tools can ingest directly. Files are opened lazily on first insert and
/// kept open until the store is dropped.
pub struct JsonLinesStore {
    dir: PathBuf,
    writers: HashMap<(String, String), BufWriter<File>>,
}

impl JsonLinesStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if dir.exists() && !dir.is_dir() {
            return Err(LoggerError::config(
                "JsonLinesStore",
                format!("'{}' is not a directory", dir.display()),
            ));
        }
        fs::create_dir_all(&dir)?;

        Ok(Self {
            dir,
            writers: HashMap::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the given collection
    pub fn path_for(&self, database: &str, collection: &str) -> PathBuf {
        self.dir.join(format!("{}.{}.jsonl", database, collection))
    }

    fn writer(&mut self, database: &str, collection: &str) -> std::io::Result<&mut BufWriter<File>> {
        let key = (database.to_string(), collection.to_string());
        if !self.writers.contains_key(&key) {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.path_for(database, collection))?;
            self.writers.insert(key.clone(), BufWriter::new(file));
        }
        self.writers
            .get_mut(&key)
            .ok_or_else(|| std::io::Error::other("collection writer missing"))
    }
}

impl DocumentStore for JsonLinesStore {
    fn insert(
        &mut self,
        database: &str,
        collection: &str,
        record: DocumentRecord,
    ) -> std::result::Result<(), StoreError> {
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        self.writer(database, collection)?.write_all(&line)?;
        Ok(())
    }

    fn flush(&mut self) -> std::result::Result<(), StoreError> {
        for writer in self.writers.values_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for JsonLinesStore {
    fn drop(&mut self) {
        let _ = DocumentStore::flush(self);
    }
}
