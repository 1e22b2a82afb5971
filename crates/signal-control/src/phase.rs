//! Signal phases and the six-phase cycle.
//!
//! A [`Phase`] pairs a [`PhaseKind`] with a duration. Its light assignment
//! is derived from the kind, so a phase can never show green to both axes.

use serde::{Deserialize, Serialize};
use signal_types::{Direction, LightState, PerDirection, PhaseKind, ScheduledPhase};

/// Errors raised when building phases.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ControlError {
    /// A phase duration that is not a positive finite number of seconds.
    #[error("invalid duration {duration} for phase {phase}: must be positive and finite")]
    InvalidDuration {
        /// The phase the duration was given for.
        phase: PhaseKind,
        /// The rejected duration.
        duration: f64,
    },

    /// A fallback green time that is not a positive finite number of seconds.
    #[error("invalid fallback green time {value}: must be positive and finite")]
    InvalidFallback {
        /// The rejected value.
        value: f64,
    },
}

/// One immutable phase of the signal cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    kind: PhaseKind,
    duration: f64,
}

impl Phase {
    /// Create a phase, rejecting non-positive or non-finite durations.
    pub fn new(kind: PhaseKind, duration: f64) -> Result<Self, ControlError> {
        if duration.is_finite() && duration > 0.0 {
            Ok(Self { kind, duration })
        } else {
            Err(ControlError::InvalidDuration {
                phase: kind,
                duration,
            })
        }
    }

    /// Which phase of the cycle this is.
    pub const fn kind(&self) -> PhaseKind {
        self.kind
    }

    /// Duration in seconds.
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// Light shown to every approach.
    pub fn lights(&self) -> PerDirection<LightState> {
        self.kind.lights()
    }

    /// Whether `direction` is green during this phase.
    pub const fn is_green_for(&self, direction: Direction) -> bool {
        matches!(self.kind.light_for(direction), LightState::Green)
    }
}

/// Durations of the six phases in cycle order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleTiming {
    /// North-south green.
    pub ns_green: f64,
    /// East-west green.
    pub ew_green: f64,
    /// Yellow after each green.
    pub yellow: f64,
    /// All-red clearance after each yellow.
    pub all_red: f64,
}

impl CycleTiming {
    /// Duration of `kind` under this timing.
    pub const fn duration_of(&self, kind: PhaseKind) -> f64 {
        match kind {
            PhaseKind::NsGreen => self.ns_green,
            PhaseKind::EwGreen => self.ew_green,
            PhaseKind::NsYellow | PhaseKind::EwYellow => self.yellow,
            PhaseKind::AllRed1 | PhaseKind::AllRed2 => self.all_red,
        }
    }

    /// Sum of all six durations.
    pub fn total(&self) -> f64 {
        PhaseKind::CYCLE
            .iter()
            .map(|&kind| self.duration_of(kind))
            .sum()
    }

    /// Build the six validated phases.
    pub fn build(&self) -> Result<[Phase; 6], ControlError> {
        let [a, b, c, d, e, f] = PhaseKind::CYCLE;
        Ok([
            Phase::new(a, self.duration_of(a))?,
            Phase::new(b, self.duration_of(b))?,
            Phase::new(c, self.duration_of(c))?,
            Phase::new(d, self.duration_of(d))?,
            Phase::new(e, self.duration_of(e))?,
            Phase::new(f, self.duration_of(f))?,
        ])
    }
}

/// Lay `phases` end to end starting at `start`.
pub fn schedule_from<'a>(
    phases: impl IntoIterator<Item = &'a Phase>,
    start: f64,
) -> Vec<ScheduledPhase> {
    let mut at = start;
    phases
        .into_iter()
        .map(|phase| {
            let row = ScheduledPhase {
                phase: phase.kind(),
                start_time: at,
                duration: phase.duration(),
                lights: phase.lights(),
            };
            at += phase.duration();
            row
        })
        .collect()
}
