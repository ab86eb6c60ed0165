//! Bulk Insert Demo
//!
//! This example demonstrates the collector's three flush triggers:
//! - size threshold: a burst of rows flushes as soon as the threshold is met
//! - quiescence: a trickle of rows flushes once submissions go quiet
//! - drain: rows arriving during a slow bulk write are batched right behind it
//!
//! Usage:
//!   cargo run --example bulk_insert

use std::time::Duration;

use batch_collector::{error_handler_fn, worker_fn, BoxError, Collector, CollectorConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> batch_collector::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let collector = Collector::new(
        CollectorConfig::new()
            .with_size_threshold(5)
            .with_quiescence(Duration::from_millis(50)),
        worker_fn(|rows: Vec<String>| async move {
            // Stand-in for a bulk INSERT: one round trip per batch.
            println!("bulk write: {} rows {:?}", rows.len(), rows);
            tokio::time::sleep(Duration::from_millis(30)).await;
            Ok::<(), BoxError>(())
        }),
        error_handler_fn(|err| async move {
            eprintln!("bulk write failed: {err}");
            Ok::<(), BoxError>(())
        }),
    )?;

    println!("--- burst of 5: flushes on the size threshold ---");
    for i in 0..5 {
        collector.submit(format!("burst-{i}"));
    }
    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("--- trickle of 2: flushes after 50ms of quiet ---");
    collector.submit("trickle-0".to_string());
    collector.submit("trickle-1".to_string());
    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("--- rows landing during a slow write drain right behind it ---");
    for i in 0..5 {
        collector.submit(format!("wave-a-{i}"));
    }
    // The 30ms bulk write for wave-a is in flight; these queue behind it and
    // go out as one batch the moment it returns, with no 50ms debounce.
    tokio::time::sleep(Duration::from_millis(5)).await;
    collector.submit("wave-b-0".to_string());
    collector.submit("wave-b-1".to_string());
    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("--- leftovers below the threshold: flush_now ---");
    collector.submit("tail-0".to_string());
    collector.flush_now();
    tokio::time::sleep(Duration::from_millis(50)).await;

    Ok(())
}
