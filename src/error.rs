use thiserror::Error;

/// Boxed error carried by collaborator failures (worker and error handler).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Unified error type for the collector.
///
/// There is exactly one runtime failure category: a worker invocation that
/// failed. Everything else is construction-time validation. Transient and
/// permanent worker failures are not distinguished at this layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid collector configuration: {message}")]
    Configuration { message: String },

    #[error("batch worker failed: {0}")]
    Worker(#[source] BoxError),
}

impl Error {
    /// Create a new configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
        }
    }
}
