//! File sink for the stream exporter

use super::stream::ClosableSink;
use crate::core::Result;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffered, append-mode file sink
///
/// Bytes are buffered in memory until the exporter flushes at the end of a
/// batch. Closing flushes and releases the file; writes after that fail.
pub struct FileSink {
    writer: Option<BufWriter<File>>,
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = Self::open(&path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            path,
        })
    }

    /// Open the file and take an exclusive advisory lock on it, so a second
    /// process logging to the same path fails fast instead of interleaving.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use log_dispatch::exporters::FileSink;
    ///
    /// let sink = FileSink::new_locked("/var/log/app.log").unwrap();
    /// ```
    #[cfg(feature = "file")]
    pub fn new_locked(path: impl Into<PathBuf>) -> Result<Self> {
        use fs2::FileExt;

        let path = path.into();
        let file = Self::open(&path)?;
        file.try_lock_exclusive()
            .map_err(|_| crate::core::LoggerError::file_lock(path.display().to_string()))?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            path,
        })
    }

    fn open(path: &Path) -> io::Result<File> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        self.writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "file sink closed"))
    }
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl ClosableSink for FileSink {
    fn close(&mut self) -> io::Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}
