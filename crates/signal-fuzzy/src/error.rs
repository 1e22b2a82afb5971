//! Error types for the `signal-fuzzy` crate.

use signal_types::Direction;

/// Errors raised while defining fuzzy variables or running inference.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FuzzyError {
    /// A universe with a non-positive resolution or an empty range.
    #[error("invalid universe [{min}, {max}] with resolution {resolution}")]
    InvalidUniverse {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
        /// Sampling step.
        resolution: f64,
    },

    /// A triangular region whose points are not finite and ordered.
    #[error("invalid region '{region}' of variable '{variable}': ({a}, {b}, {c})")]
    InvalidRegion {
        /// Owning variable name.
        variable: String,
        /// Region name.
        region: &'static str,
        /// Left foot.
        a: f64,
        /// Peak.
        b: f64,
        /// Right foot.
        c: f64,
    },

    /// The aggregated output curve has zero area, so no centroid exists.
    #[error("no rule fired for direction {direction}; aggregated output is empty")]
    DegenerateOutput {
        /// Direction whose inference failed.
        direction: Direction,
    },
}
