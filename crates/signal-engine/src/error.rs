//! Error types for the comparison binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup, the comparison runs and report output.

/// Top-level error for the comparison binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: signal_control::config::ConfigError,
    },

    /// A custom scenario was invalid.
    #[error("scenario error: {source}")]
    Scenario {
        /// The underlying scenario error.
        #[from]
        source: signal_control::scenario::ScenarioError,
    },

    /// A comparison run failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: signal_control::runner::RunnerError,
    },

    /// The report could not be serialized.
    #[error("report serialization failed: {source}")]
    Serialize {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The report could not be written.
    #[error("failed to write report to {path}: {source}")]
    Write {
        /// Destination path.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
