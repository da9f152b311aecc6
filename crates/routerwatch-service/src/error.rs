//! Error types for the host service binary.
//!
//! [`ServiceError`] is the top-level error type that wraps all failure
//! modes during service startup, so `main` can propagate everything
//! with `?`.

/// Top-level error for the host service binary.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// The monitor refused to start.
    #[error("monitor error: {source}")]
    Monitor {
        /// The underlying monitor error.
        #[from]
        source: routerwatch_monitor::MonitorError,
    },
}
