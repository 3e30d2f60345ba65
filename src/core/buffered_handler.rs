//! Buffered handler: level filter, bounded buffer, batched export
//!
//! Incoming messages are appended to a mutex-guarded buffer. When the buffer
//! reaches capacity, or `flush` is called, its contents are swapped out for
//! an empty buffer under the lock and stamped with a ticket. The caller that
//! sealed a batch exports it once every earlier ticket has been exported.
//! Sink I/O never runs under the buffer lock and racing flushes still reach
//! the sink in FIFO order. Each caller gets only its own batch's result.

use super::{
    config::BufferConfig,
    error::Result,
    exporter::Exporter,
    handler::Handler,
    level_filter::LevelFilter,
    log_level::LogLevel,
    message::Message,
    metrics::HandlerMetrics,
    processor::Processor,
};
use parking_lot::{Condvar, MappedMutexGuard, Mutex, MutexGuard};
use std::collections::HashSet;
use std::sync::Arc;

type Batch = Vec<Arc<Message>>;

#[derive(Default)]
struct BufferState {
    /// Messages accepted since the last seal
    pending: Batch,
    /// Ticket handed to the next sealed batch
    next_ticket: u64,
}

impl BufferState {
    fn seal(&mut self) -> (u64, Batch) {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        (ticket, std::mem::take(&mut self.pending))
    }
}

struct ExportState<E> {
    exporter: E,
    /// Ticket whose batch may be exported now
    now_serving: u64,
}

/// Wakes ticket waiters even if the exporter panics mid-batch
struct NotifyOnDrop<'a>(&'a Condvar);

impl Drop for NotifyOnDrop<'_> {
    fn drop(&mut self) {
        self.0.notify_all();
    }
}

/// Handler that buffers accepted messages and exports them in batches.
///
/// Delivery is at-most-once: a batch is exported in order until the first
/// exporter error, the error is returned to the caller that sealed the
/// batch, and the rest of that batch is discarded. Nothing is retried.
///
/// Processors and level sets are changed through `&mut self`, so they are
/// configured before the handler is shared between threads.
///
/// # Example
///
/// ```
/// use log_dispatch::core::{BufferedHandler, Handler, LogLevel, Message, SimpleFormatter};
/// use log_dispatch::exporters::StreamExporter;
/// use std::sync::Arc;
///
/// let exporter = StreamExporter::new(Vec::new(), SimpleFormatter::new());
/// let handler = BufferedHandler::builder(exporter)
///     .capacity(2)
///     .skip_levels([LogLevel::Debug])
///     .build();
///
/// handler.handle(Arc::new(Message::new(LogLevel::Info, "first"))).unwrap();
/// assert_eq!(handler.len(), 1);
/// handler.handle(Arc::new(Message::new(LogLevel::Info, "second"))).unwrap();
/// assert!(handler.is_empty());
/// ```
pub struct BufferedHandler<E: Exporter> {
    name: String,
    capacity: usize,
    filter: LevelFilter,
    processors: Vec<Box<dyn Processor>>,
    state: Mutex<BufferState>,
    export: Mutex<ExportState<E>>,
    turn: Condvar,
    metrics: HandlerMetrics,
}

impl<E: Exporter> BufferedHandler<E> {
    pub fn new(exporter: E, capacity: usize) -> Self {
        Self::builder(exporter).capacity(capacity).build()
    }

    #[must_use]
    pub fn builder(exporter: E) -> BufferedHandlerBuilder<E> {
        BufferedHandlerBuilder::new(exporter)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of messages currently buffered and not yet sealed for export
    pub fn len(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn filter(&self) -> &LevelFilter {
        &self.filter
    }

    pub fn metrics(&self) -> &HandlerMetrics {
        &self.metrics
    }

    /// Lock and borrow the exporter.
    ///
    /// Holding the guard blocks exports from this handler.
    pub fn exporter(&self) -> MappedMutexGuard<'_, E> {
        MutexGuard::map(self.export.lock(), |state| &mut state.exporter)
    }

    /// Append a processor; processors run in registration order
    pub fn add_processor<P: Processor + 'static>(&mut self, processor: P) {
        self.processors.push(Box::new(processor));
    }

    pub fn clear_processors(&mut self) {
        self.processors.clear();
    }

    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }

    #[inline]
    fn threshold(&self) -> usize {
        self.capacity.max(1)
    }

    fn apply_processors(&self, message: Arc<Message>) -> Arc<Message> {
        if self.processors.is_empty() {
            return message;
        }

        let processed = self
            .processors
            .iter()
            .fold(Arc::unwrap_or_clone(message), |msg, p| p.process(msg));
        Arc::new(processed)
    }

    /// Export a sealed batch once every earlier ticket has been served.
    ///
    /// An empty batch only waits its turn, so a flush returns after every
    /// batch sealed before it has reached the exporter.
    fn export_in_turn(&self, ticket: u64, batch: Batch) -> Result<()> {
        let mut export = self.export.lock();
        while export.now_serving != ticket {
            self.turn.wait(&mut export);
        }
        export.now_serving += 1;
        let _notify = NotifyOnDrop(&self.turn);

        if batch.is_empty() {
            return Ok(());
        }
        self.export_batch(&mut export.exporter, &batch)
    }

    fn export_batch(&self, exporter: &mut E, batch: &[Arc<Message>]) -> Result<()> {
        self.metrics.record_flush();

        for (idx, message) in batch.iter().enumerate() {
            if let Err(e) = exporter.export_message(message) {
                let unreached = (batch.len() - idx - 1) as u64;
                self.metrics.record_failed();
                self.metrics.record_dropped(unreached);

                // Push out whatever made it before the failure
                if let Err(flush_err) = exporter.flush() {
                    eprintln!(
                        "[LOGGER ERROR] Handler '{}' flush after failed export also failed: {}",
                        self.name, flush_err
                    );
                }
                return Err(e);
            }
            self.metrics.record_exported();
        }

        exporter.flush()
    }
}

impl<E: Exporter> Handler for BufferedHandler<E> {
    fn handle(&self, message: Arc<Message>) -> Result<()> {
        if !self.filter.accepts(&message) {
            self.metrics.record_filtered();
            return Ok(());
        }
        self.metrics.record_accepted();

        let message = self.apply_processors(message);

        let sealed = {
            let mut state = self.state.lock();
            state.pending.push(message);
            if state.pending.len() >= self.threshold() {
                Some(state.seal())
            } else {
                None
            }
        };

        match sealed {
            Some((ticket, batch)) => self.export_in_turn(ticket, batch),
            None => Ok(()),
        }
    }

    fn accepts(&self, message: &Message) -> bool {
        self.filter.accepts(message)
    }

    fn set_accept_levels(&mut self, levels: Option<HashSet<LogLevel>>) {
        self.filter.set_accept_levels(levels);
    }

    fn set_skip_levels(&mut self, levels: Option<HashSet<LogLevel>>) {
        self.filter.set_skip_levels(levels);
    }

    fn flush(&self) -> Result<()> {
        let (ticket, batch) = self.state.lock().seal();
        self.export_in_turn(ticket, batch)
    }

    fn close(&self) -> Result<()> {
        let flushed = self.flush();
        let closed = self.export.lock().exporter.close();
        flushed.and(closed)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<E: Exporter> Drop for BufferedHandler<E> {
    fn drop(&mut self) {
        if self.state.get_mut().pending.is_empty() {
            return;
        }
        if let Err(e) = Handler::flush(self) {
            eprintln!(
                "[LOGGER ERROR] Handler '{}' lost buffered messages on drop: {}",
                self.name, e
            );
        }
    }
}

/// Builder for [`BufferedHandler`]
///
/// # Example
///
/// ```
/// use log_dispatch::core::{BufferedHandler, LogLevel, RedactFields, SimpleFormatter};
/// use log_dispatch::exporters::StreamExporter;
///
/// let handler = BufferedHandler::builder(StreamExporter::stdout(SimpleFormatter::new()))
///     .name("console")
///     .capacity(100)
///     .accept_levels([LogLevel::Warning, LogLevel::Error])
///     .processor(RedactFields::new(["password"]))
///     .build();
/// ```
pub struct BufferedHandlerBuilder<E: Exporter> {
    exporter: E,
    name: Option<String>,
    capacity: usize,
    filter: LevelFilter,
    processors: Vec<Box<dyn Processor>>,
}

impl<E: Exporter> BufferedHandlerBuilder<E> {
    pub fn new(exporter: E) -> Self {
        Self {
            exporter,
            name: None,
            capacity: BufferConfig::default().capacity,
            filter: LevelFilter::new(),
            processors: Vec::new(),
        }
    }

    /// Name used in diagnostics; defaults to the exporter name
    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn accept_levels(mut self, levels: impl IntoIterator<Item = LogLevel>) -> Self {
        self.filter = self.filter.with_accept_levels(levels);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn skip_levels(mut self, levels: impl IntoIterator<Item = LogLevel>) -> Self {
        self.filter = self.filter.with_skip_levels(levels);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn filter(mut self, filter: LevelFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Apply capacity and level sets from a [`BufferConfig`]
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: &BufferConfig) -> Self {
        self.capacity = config.capacity;
        self.filter = config.level_filter();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn processor<P: Processor + 'static>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    pub fn build(self) -> BufferedHandler<E> {
        let name = self
            .name
            .unwrap_or_else(|| self.exporter.name().to_string());

        BufferedHandler {
            name,
            capacity: self.capacity,
            filter: self.filter,
            processors: self.processors,
            state: Mutex::new(BufferState {
                pending: Vec::with_capacity(self.capacity.max(1)),
                next_ticket: 0,
            }),
            export: Mutex::new(ExportState {
                exporter: self.exporter,
                now_serving: 0,
            }),
            turn: Condvar::new(),
            metrics: HandlerMetrics::new(),
        }
    }
}

impl<E: Exporter> From<BufferedHandlerBuilder<E>> for BufferedHandler<E> {
    fn from(builder: BufferedHandlerBuilder<E>) -> Self {
        builder.build()
    }
}
