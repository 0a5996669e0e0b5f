//! Lifecycle error types.

use thiserror::Error;

/// Errors raised while observing or changing the process lifecycle.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A signal listener could not be installed.
    #[error("failed to listen for {signal}: {source}")]
    Listen {
        signal: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The process could not stop itself.
    #[error("failed to suspend the process: {0}")]
    Suspend(#[source] std::io::Error),

    /// Job control is not available on this platform.
    #[error("suspending is not supported on this platform")]
    Unsupported,
}
