//! Error types for the `signal-queue` crate.

use signal_types::{Direction, TypesError};

/// Errors raised when configuring or driving the queue simulator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueueError {
    /// A tick length that is not a positive finite number of seconds.
    #[error("invalid time step {value}: must be positive and finite")]
    InvalidTimeStep {
        /// The rejected step.
        value: f64,
    },

    /// A departure interval that is not a positive finite number of seconds.
    #[error("invalid departure interval {value}: must be positive and finite")]
    InvalidDepartureInterval {
        /// The rejected interval.
        value: f64,
    },

    /// A negative or non-finite arrival rate.
    #[error("invalid arrival rate {rate} for {direction}: must be finite and non-negative")]
    InvalidArrivalRate {
        /// Approach the rate was given for.
        direction: Direction,
        /// The rejected rate, vehicles per minute.
        rate: f64,
    },

    /// A direction name that could not be parsed.
    #[error(transparent)]
    Direction(#[from] TypesError),
}
