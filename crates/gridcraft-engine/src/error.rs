//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure the driver can hit at startup or
//! while serving a command.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: gridcraft_core::ConfigError,
    },

    /// The executor refused a request or a reset failed.
    #[error("core error: {source}")]
    Core {
        /// The underlying core error.
        #[from]
        source: gridcraft_core::CoreError,
    },

    /// Reading stdin or writing stdout failed.
    #[error("io error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A command line or a response could not be (de)serialized.
    #[error("json error: {source}")]
    Json {
        /// The underlying serde error.
        #[from]
        source: serde_json::Error,
    },
}
