//! Integration tests for log_dispatch
//!
//! These tests verify:
//! - Capacity-triggered and manual export through real exporters
//! - Failure containment across handlers
//! - Level filtering through the logger
//! - Document-store record layout
//! - Shutdown and close semantics

use log_dispatch::core::{
    BufferConfig, BufferedHandler, Exporter, Handler, JsonFormatter, LogContext, LogLevel,
    Logger, LoggerError, Message, RedactFields, Result, SimpleFormatter, StaticFields,
};
use log_dispatch::exporters::{
    DocumentExporter, DocumentRecord, JsonLinesStore, MemoryDocumentStore, StreamExporter,
};
use parking_lot::Mutex;
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use tempfile::TempDir;

// ============================================================================
// Test doubles
// ============================================================================

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().clone())
            .expect("utf-8 output")
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Records message texts; fails on the n-th export (1-based) if configured
#[derive(Clone, Default)]
struct RecordingExporter {
    texts: Arc<Mutex<Vec<String>>>,
    attempts: Arc<Mutex<usize>>,
    fail_on: Option<usize>,
}

impl RecordingExporter {
    fn failing_on(n: usize) -> Self {
        Self {
            fail_on: Some(n),
            ..Self::default()
        }
    }

    fn texts(&self) -> Vec<String> {
        self.texts.lock().clone()
    }
}

impl Exporter for RecordingExporter {
    fn export_message(&mut self, message: &Message) -> Result<()> {
        let attempt = {
            let mut attempts = self.attempts.lock();
            *attempts += 1;
            *attempts
        };
        if self.fail_on == Some(attempt) {
            return Err(LoggerError::sink_write(
                "recording",
                io::Error::new(io::ErrorKind::BrokenPipe, "sink went away"),
            ));
        }
        self.texts.lock().push(message.text.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

// ============================================================================
// Buffering through real exporters
// ============================================================================

#[test]
fn test_file_exporter_receives_batches() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("logs").join("app.log");

    let exporter =
        StreamExporter::file(&log_file, SimpleFormatter::new()).expect("Failed to open file");
    let handler = BufferedHandler::new(exporter, 3);

    for i in 0..5 {
        handler
            .handle(Arc::new(Message::new(LogLevel::Info, format!("Message {}", i))))
            .expect("export should succeed");
    }

    // First batch of three has been exported, two are still buffered
    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(content.lines().count(), 3);
    assert_eq!(handler.len(), 2);

    handler.close().expect("close should succeed");
    assert!(handler.exporter().is_closed());

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 5);
    for (i, line) in lines.iter().enumerate() {
        assert!(line.ends_with(&format!("[INFO] Message {}", i)), "line {}: {}", i, line);
    }
}

#[test]
fn test_threshold_at_capacity() {
    let exporter = RecordingExporter::default();
    let handler = BufferedHandler::new(exporter.clone(), 4);

    for i in 0..4 {
        handler
            .handle(Arc::new(Message::new(LogLevel::Debug, i.to_string())))
            .expect("handle");
    }
    assert!(handler.is_empty());
    assert_eq!(exporter.texts(), vec!["0", "1", "2", "3"]);

    handler
        .handle(Arc::new(Message::new(LogLevel::Debug, "4")))
        .expect("handle");
    assert_eq!(handler.len(), 1);
    assert_eq!(exporter.texts().len(), 4);
}

#[test]
fn test_manual_flush_drains_partial_buffer() {
    let exporter = RecordingExporter::default();
    let handler = BufferedHandler::new(exporter.clone(), 10);

    for text in ["a", "b", "c"] {
        handler
            .handle(Arc::new(Message::new(LogLevel::Notice, text)))
            .expect("handle");
    }
    assert!(exporter.texts().is_empty());

    handler.flush().expect("flush");
    assert_eq!(exporter.texts(), vec!["a", "b", "c"]);
    assert!(handler.is_empty());

    handler.flush().expect("second flush");
    assert_eq!(exporter.texts().len(), 3);
    assert_eq!(handler.metrics().flushes(), 1);
}

// ============================================================================
// Failure containment
// ============================================================================

#[test]
fn test_failing_handler_does_not_affect_others() {
    let failing = RecordingExporter::failing_on(2);
    let healthy: Vec<RecordingExporter> = (0..4).map(|_| RecordingExporter::default()).collect();

    let mut builder = Logger::builder().handler(BufferedHandler::new(failing.clone(), 10));
    for exporter in &healthy {
        builder = builder.handler(BufferedHandler::new(exporter.clone(), 10));
    }
    let logger = builder.build();

    for i in 0..5 {
        logger.error(format!("event {}", i));
    }

    let err = logger.flush_all().expect_err("failing handler must report");
    assert!(matches!(err, LoggerError::SinkWrite { .. }));

    // Only the message before the failure reached the failing sink
    assert_eq!(failing.texts(), vec!["event 0"]);

    for exporter in &healthy {
        assert_eq!(exporter.texts().len(), 5);
    }
    for handler in logger.handlers() {
        assert!(handler.flush().is_ok(), "buffers are empty after the failed flush");
    }
    assert_eq!(logger.metrics().flush_errors(), 1);
}

#[test]
fn test_threshold_failure_is_swallowed_by_logger() {
    let failing = RecordingExporter::failing_on(1);
    let logger = Logger::builder()
        .handler(BufferedHandler::new(failing.clone(), 1))
        .build();

    logger.critical("lost");
    logger.critical("kept");

    assert_eq!(failing.texts(), vec!["kept"]);
    assert_eq!(logger.metrics().handler_errors(), 1);
    assert_eq!(logger.metrics().total_logged(), 2);
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_accept_set_wins_over_skip_set() {
    let exporter = RecordingExporter::default();
    let handler = BufferedHandler::builder(exporter.clone())
        .capacity(1)
        .accept_levels([LogLevel::Error, LogLevel::Critical])
        .skip_levels([LogLevel::Error])
        .build();
    let logger = Logger::builder().handler(handler).build();

    logger.error("error");
    logger.critical("critical");
    logger.info("info");

    assert_eq!(exporter.texts(), vec!["error", "critical"]);
}

#[test]
fn test_skip_set_and_filter_replacement() {
    let exporter = RecordingExporter::default();
    let handler = BufferedHandler::builder(exporter.clone())
        .capacity(1)
        .skip_levels([LogLevel::Debug])
        .build();
    let mut logger = Logger::builder().handler(handler).build();

    logger.debug("dropped");
    logger.info("kept");

    logger.handlers_mut()[0].set_skip_levels(None);
    logger.debug("now kept");

    assert_eq!(exporter.texts(), vec!["kept", "now kept"]);
}

#[test]
fn test_handler_from_json_config() {
    let config = BufferConfig::from_json(r#"{"capacity": 2, "skip_levels": ["DEBUG"]}"#)
        .expect("valid config");
    let exporter = RecordingExporter::default();
    let handler = BufferedHandler::builder(exporter.clone())
        .config(&config)
        .build();

    assert_eq!(handler.capacity(), 2);
    assert!(!handler.accepts(&Message::new(LogLevel::Debug, "x")));
    assert!(handler.accepts(&Message::new(LogLevel::Warning, "x")));
}

// ============================================================================
// Formats and stores
// ============================================================================

#[test]
fn test_json_lines_output() {
    let buffer = SharedBuffer::default();
    let logger = Logger::builder()
        .handler(BufferedHandler::new(
            StreamExporter::new(buffer.clone(), JsonFormatter::new()),
            2,
        ))
        .build();

    logger.warning_with_context(
        "disk almost full",
        LogContext::new().with_field("free_mb", 512).with_field("mount", "/var"),
    );
    logger.info("second");

    let lines = buffer.lines();
    assert_eq!(lines.len(), 2);

    let first: serde_json::Value = serde_json::from_str(&lines[0]).expect("valid JSON");
    assert_eq!(first["level"], "WARNING");
    assert_eq!(first["message"], "disk almost full");
    assert_eq!(first["context"]["free_mb"], 512);
    assert_eq!(first["context"]["mount"], "/var");
    assert!(first["timestamp"].is_string());
}

#[test]
fn test_document_store_records() {
    let store = MemoryDocumentStore::new();
    let logger = Logger::builder()
        .handler(BufferedHandler::new(
            DocumentExporter::new(store.clone(), "shop", "events"),
            10,
        ))
        .build();

    logger.notice_with_context("order placed", LogContext::new().with_field("order_id", 42));
    logger.error("payment failed");
    assert_eq!(store.count("shop", "events"), 0);

    logger.flush_all().expect("flush");

    let records = store.records("shop", "events");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].level, LogLevel::Notice);
    assert_eq!(records[0].message, "order placed");
    assert_eq!(records[1].message, "payment failed");
    assert!(records[1].context.is_empty());

    let value = serde_json::to_value(&records[0]).expect("serializable");
    let keys: Vec<&String> = value.as_object().expect("object").keys().collect();
    assert_eq!(keys.len(), 4);
    assert_eq!(value["level"], "NOTICE");
    assert_eq!(value["context"]["order_id"], 42);
    // Second precision, no fractional part
    assert_eq!(value["timestamp"].as_str().map(str::len), Some(19));
}

#[test]
fn test_json_lines_store_via_logger() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = JsonLinesStore::new(temp_dir.path().join("store")).expect("store");
    let path = store.path_for("app", "audit");

    {
        let logger = Logger::builder()
            .handler(BufferedHandler::new(
                DocumentExporter::new(store, "app", "audit"),
                100,
            ))
            .build();
        logger.info("user created");
        logger.info("user deleted");
        // Dropping the logger flushes the buffer
    }

    let content = fs::read_to_string(&path).expect("Failed to read store file");
    let records: Vec<DocumentRecord> = content
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid record"))
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].message, "user deleted");
}

// ============================================================================
// Processors
// ============================================================================

#[test]
fn test_processors_apply_before_export() {
    let store = MemoryDocumentStore::new();
    let handler = BufferedHandler::builder(DocumentExporter::new(store.clone(), "db", "logs"))
        .capacity(1)
        .processor(RedactFields::new(["password"]))
        .processor(StaticFields::new().with_field("service", "auth"))
        .build();
    let logger = Logger::builder().handler(handler).build();

    logger.info_with_context(
        "login",
        LogContext::new()
            .with_field("user", "alice")
            .with_field("password", "hunter2"),
    );

    let record = &store.records("db", "logs")[0];
    assert_eq!(record.context.get("password"), Some(&"[REDACTED]".into()));
    assert_eq!(record.context.get("service"), Some(&"auth".into()));
    assert_eq!(record.context.get("user"), Some(&"alice".into()));
}

// ============================================================================
// Shutdown
// ============================================================================

#[test]
fn test_shutdown_closes_file_sink() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("shutdown.log");

    let mut logger = Logger::builder()
        .handler(BufferedHandler::new(
            StreamExporter::file(&log_file, SimpleFormatter::new()).expect("file"),
            50,
        ))
        .build();

    logger.emergency("going down");
    logger.shutdown().expect("shutdown");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert!(content.contains("[EMERGENCY] going down"));

    // A closed logger discards later messages instead of buffering them
    logger.info("after shutdown");
    assert!(logger.flush_all().is_ok());
    assert_eq!(logger.metrics().total_logged(), 1);
    assert_eq!(logger.metrics().handler_errors(), 0);
    assert_eq!(fs::read_to_string(&log_file).expect("read"), content);
}

#[test]
fn test_logger_drop_flushes_to_stream() {
    let buffer = SharedBuffer::default();
    {
        let logger = Logger::builder()
            .handler(BufferedHandler::new(
                StreamExporter::new(buffer.clone(), SimpleFormatter::new()),
                100,
            ))
            .build();
        logger.info("one");
        logger.info("two");
        assert!(buffer.lines().is_empty());
    }

    let lines = buffer.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].ends_with("[INFO] two"));
}
