//! Document store example
//!
//! Demonstrates exporting log records into per-collection JSON lines files.
//!
//! Run with: cargo run --example document_store

use log_dispatch::exporters::JsonLinesStore;
use log_dispatch::prelude::*;
use std::sync::Arc;
use std::thread;

fn main() -> Result<()> {
    println!("=== Log Dispatch - Document Store Example ===\n");

    let store = JsonLinesStore::new("log_store")?;
    let path = store.path_for("app", "events");

    let handler = BufferedHandler::builder(DocumentExporter::new(store, "app", "events"))
        .capacity(10)
        .skip_levels([LogLevel::Debug])
        .build();
    let logger = Arc::new(Logger::builder().handler(handler).build());

    println!("1. Multi-threaded logging:");
    let handles: Vec<_> = (0..5)
        .map(|thread_id| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..20 {
                    logger.info_with_context(
                        "work item done",
                        LogContext::new()
                            .with_field("thread", thread_id)
                            .with_field("item", i),
                    );
                    logger.debug("not stored");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread panicked");
    }
    println!("   5 threads logged 20 records each");

    logger.export_buffered_messages()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check '{}' for the stored records", path.display());

    Ok(())
}
