//! Error types for the `signal-types` crate.

/// Errors raised when converting external input into shared types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypesError {
    /// A direction name outside {north, south, east, west}.
    #[error("invalid direction '{name}': must be one of north, south, east, west")]
    InvalidDirection {
        /// The rejected name, as given.
        name: String,
    },
}
