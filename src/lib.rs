//! # batch-collector
//!
//! 批量收集器：将逐条提交的任务聚合成批，交给下游的批处理函数执行。
//!
//! A debounced, size-bounded batching buffer. Producers submit items one at a
//! time; the collector groups them into ordered batches and hands each batch
//! to a single async worker, either when the batch reaches a size threshold
//! or after a quiescence period elapses since the last submission. Typical
//! use is amortizing a bulk operation (a bulk database write, a batched API
//! call) over many individually produced items.
//!
//! ## Guarantees
//!
//! - **Ordering**: the concatenation of delivered batches equals the
//!   submission order; no item is duplicated or dropped while the worker
//!   succeeds.
//! - **Single flight**: at most one worker invocation is in flight per
//!   collector instance, for all submission timings.
//! - **Bounded latency under load**: items that arrive during an in-flight
//!   worker call are drained into follow-up batches immediately after it
//!   returns, without waiting out another quiescence period.
//! - **Non-blocking submission**: `submit` only performs bookkeeping; it
//!   never waits for the worker.
//!
//! The collector does not persist items, does not signal backpressure, and
//! does not retry a failed worker call: a failure is reported once to the
//! injected error handler and the batch is dropped.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use batch_collector::{error_handler_fn, worker_fn, BoxError, Collector, CollectorConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> batch_collector::Result<()> {
//!     let collector = Collector::new(
//!         CollectorConfig::new()
//!             .with_size_threshold(64)
//!             .with_quiescence(Duration::from_millis(20)),
//!         worker_fn(|rows: Vec<String>| async move {
//!             // bulk write `rows` downstream
//!             Ok::<(), BoxError>(())
//!         }),
//!         error_handler_fn(|err| async move {
//!             eprintln!("bulk write failed: {err}");
//!             Ok::<(), BoxError>(())
//!         }),
//!     )?;
//!
//!     collector.submit("row-1".to_string());
//!     collector.submit("row-2".to_string());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`collector`] | The collector core, its configuration, and the quiescence timer |
//! | [`worker`] | Injected collaborator traits and closure adapters |
//! | [`error`] | Unified error type |

pub mod collector;
pub mod error;
pub mod worker;

// Re-export main types for convenience
pub use collector::{Collector, CollectorConfig, ThresholdPolicy};
pub use error::{BoxError, Error};
pub use worker::{
    error_handler_fn, worker_fn, BatchWorker, ErrorHandler, LoggingErrorHandler, NoopErrorHandler,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
