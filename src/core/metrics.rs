//! Logger and handler metrics for observability
//!
//! Handler errors on the logging hot path are swallowed, so these counters
//! are the way to notice a failing sink without calling `flush_all`.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for the dispatching logger
///
/// # Example
///
/// ```
/// use log_dispatch::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_logged();
/// metrics.record_handler_error();
///
/// assert_eq!(metrics.total_logged(), 1);
/// assert_eq!(metrics.handler_errors(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Messages built and dispatched to handlers
    total_logged: AtomicU64,

    /// Handler failures swallowed during `log`
    handler_errors: AtomicU64,

    /// Handler failures reported by `flush_all`
    flush_errors: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            handler_errors: AtomicU64::new(0),
            flush_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn handler_errors(&self) -> u64 {
        self.handler_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_errors(&self) -> u64 {
        self.flush_errors.load(Ordering::Relaxed)
    }

    /// Record a dispatched message, returning the previous count
    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a swallowed handler error, returning the previous count
    #[inline]
    pub fn record_handler_error(&self) -> u64 {
        self.handler_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flush_error(&self) -> u64 {
        self.flush_errors.fetch_add(1, Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.total_logged.store(0, Ordering::Relaxed);
        self.handler_errors.store(0, Ordering::Relaxed);
        self.flush_errors.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            total_logged: AtomicU64::new(self.total_logged()),
            handler_errors: AtomicU64::new(self.handler_errors()),
            flush_errors: AtomicU64::new(self.flush_errors()),
        }
    }
}

/// Per-handler counters
#[derive(Debug)]
pub struct HandlerMetrics {
    /// Messages that passed the level filter and were buffered
    accepted: AtomicU64,

    /// Messages rejected by the level filter
    filtered: AtomicU64,

    /// Messages the exporter wrote successfully
    exported: AtomicU64,

    /// Messages the exporter failed on
    failed: AtomicU64,

    /// Messages discarded because an earlier message in their batch failed
    dropped: AtomicU64,

    /// Batches handed to the exporter
    flushes: AtomicU64,
}

impl HandlerMetrics {
    pub const fn new() -> Self {
        Self {
            accepted: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            exported: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn exported(&self) -> u64 {
        self.exported.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flushes(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_filtered(&self) {
        self.filtered.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_exported(&self) {
        self.exported.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_dropped(&self, count: u64) {
        self.dropped.fetch_add(count, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_flush(&self) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.accepted.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.exported.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
        self.flushes.store(0, Ordering::Relaxed);
    }
}

impl Default for HandlerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for HandlerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            accepted: AtomicU64::new(self.accepted()),
            filtered: AtomicU64::new(self.filtered()),
            exported: AtomicU64::new(self.exported()),
            failed: AtomicU64::new(self.failed()),
            dropped: AtomicU64::new(self.dropped()),
            flushes: AtomicU64::new(self.flushes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.total_logged(), 0);
        assert_eq!(metrics.handler_errors(), 0);
        assert_eq!(metrics.flush_errors(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_handler_error(), 0);
        assert_eq!(metrics.record_handler_error(), 1);
        assert_eq!(metrics.handler_errors(), 2);
    }

    #[test]
    fn test_logger_metrics_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_logged();
        metrics.record_flush_error();

        metrics.reset();

        assert_eq!(metrics.total_logged(), 0);
        assert_eq!(metrics.flush_errors(), 0);
    }

    #[test]
    fn test_handler_metrics_clone_is_snapshot() {
        let metrics = HandlerMetrics::new();
        metrics.record_exported();
        metrics.record_dropped(3);

        let snapshot = metrics.clone();
        metrics.record_exported();

        assert_eq!(snapshot.exported(), 1);
        assert_eq!(snapshot.dropped(), 3);
        assert_eq!(metrics.exported(), 2);
    }
}
