//! Error types for the demo binary.
//!
//! [`DemoError`] is the top-level error type that wraps all possible
//! failure modes during startup and the command loop.

/// Top-level error for the demo binary.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: tbd_flags::ConfigError,
    },

    /// The local storage file could not be opened.
    #[error("storage error: {source}")]
    Storage {
        /// The underlying storage error.
        #[from]
        source: tbd_flags::StorageError,
    },

    /// Reading commands from stdin failed.
    #[error("input error: {source}")]
    Input {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
