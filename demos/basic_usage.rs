//! Basic usage example
//!
//! Demonstrates a logger with a console handler and a filtered file handler.
//!
//! Run with: cargo run --example basic_usage

use log_dispatch::prelude::*;
use log_dispatch::{info, warning};

fn main() -> Result<()> {
    println!("=== Log Dispatch - Basic Usage Example ===\n");

    let console = BufferedHandler::builder(StreamExporter::stdout(
        SimpleFormatter::new().with_colors(true),
    ))
    .name("console")
    .capacity(1)
    .build();

    let errors = BufferedHandler::builder(StreamExporter::file("errors.log", JsonFormatter::new())?)
        .name("errors")
        .accept_levels([LogLevel::Emergency, LogLevel::Critical, LogLevel::Error])
        .build();

    let mut logger = Logger::builder().handler(console).handler(errors).build();

    println!("1. Every level:");
    logger.emergency("Emergency message");
    logger.critical("Critical message");
    logger.error("Error message");
    logger.warning("Warning message");
    logger.notice("Notice message");
    logger.info("Info message");
    logger.debug("Debug message");

    println!("\n2. Structured context:");
    logger.info_with_context(
        "User signed in",
        LogContext::new()
            .with_field("user_id", 42)
            .with_field("method", "password"),
    );

    println!("\n3. Macros:");
    let port = 8080;
    info!(logger, "Listening on port {}", port);
    warning!(logger, "Retry attempt {} of {}", 3, 5);

    logger.shutdown()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'errors.log' for the error-only JSON output");

    Ok(())
}
