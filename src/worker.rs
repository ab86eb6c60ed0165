//! Injected collaborator traits: the batch worker and the error handler.
//!
//! The collector itself never knows how a batch is processed or how failures
//! are reported; both behaviors are supplied at construction time through the
//! traits below. For quick wiring, [`worker_fn`] and [`error_handler_fn`]
//! adapt plain async closures.

use async_trait::async_trait;
use std::future::Future;
use tracing::error;

use crate::error::{BoxError, Error};

/// Downstream consumer of a full batch.
///
/// Receives the buffered items in submission order; the collector only ever
/// hands over a non-empty batch. A failure is routed to the collector's
/// [`ErrorHandler`] and the batch is dropped, not retried, so the worker is
/// responsible for its own partial-progress semantics.
#[async_trait]
pub trait BatchWorker<T>: Send + Sync {
    async fn process(&self, batch: Vec<T>) -> std::result::Result<(), BoxError>;
}

/// Receives worker failures.
///
/// The handler's own outcome is not observed by the collector: a failing
/// handler is neither retried nor re-reported. Avoiding data loss on failure
/// is the handler's job.
#[async_trait]
pub trait ErrorHandler: Send + Sync {
    async fn handle(&self, error: Error) -> std::result::Result<(), BoxError>;
}

/// Adapter wrapping an async closure as a [`BatchWorker`].
pub struct WorkerFn<F>(F);

/// Build a [`BatchWorker`] from an async closure.
///
/// ```rust
/// use batch_collector::{worker_fn, BoxError};
///
/// let worker = worker_fn(|batch: Vec<String>| async move {
///     println!("bulk write of {} rows", batch.len());
///     Ok::<(), BoxError>(())
/// });
/// # let _ = worker;
/// ```
pub fn worker_fn<T, F, Fut>(f: F) -> WorkerFn<F>
where
    F: Fn(Vec<T>) -> Fut,
    Fut: Future<Output = std::result::Result<(), BoxError>>,
{
    WorkerFn(f)
}

#[async_trait]
impl<T, F, Fut> BatchWorker<T> for WorkerFn<F>
where
    T: Send + 'static,
    F: Fn(Vec<T>) -> Fut + Send + Sync,
    Fut: Future<Output = std::result::Result<(), BoxError>> + Send,
{
    async fn process(&self, batch: Vec<T>) -> std::result::Result<(), BoxError> {
        (self.0)(batch).await
    }
}

/// Adapter wrapping an async closure as an [`ErrorHandler`].
pub struct ErrorHandlerFn<F>(F);

/// Build an [`ErrorHandler`] from an async closure.
pub fn error_handler_fn<F, Fut>(f: F) -> ErrorHandlerFn<F>
where
    F: Fn(Error) -> Fut,
    Fut: Future<Output = std::result::Result<(), BoxError>>,
{
    ErrorHandlerFn(f)
}

#[async_trait]
impl<F, Fut> ErrorHandler for ErrorHandlerFn<F>
where
    F: Fn(Error) -> Fut + Send + Sync,
    Fut: Future<Output = std::result::Result<(), BoxError>> + Send,
{
    async fn handle(&self, error: Error) -> std::result::Result<(), BoxError> {
        (self.0)(error).await
    }
}

/// Handler that drops failures silently.
pub struct NoopErrorHandler;

#[async_trait]
impl ErrorHandler for NoopErrorHandler {
    async fn handle(&self, _error: Error) -> std::result::Result<(), BoxError> {
        Ok(())
    }
}

/// Handler that reports failures through `tracing` at error level.
pub struct LoggingErrorHandler;

#[async_trait]
impl ErrorHandler for LoggingErrorHandler {
    async fn handle(&self, error: Error) -> std::result::Result<(), BoxError> {
        error!(%error, "dropped batch");
        Ok(())
    }
}
