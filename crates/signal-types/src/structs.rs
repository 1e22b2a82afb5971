//! Plain data structs exchanged between the simulator, controllers and
//! reporting.

use serde::{Deserialize, Serialize};

use crate::direction::{Direction, PerDirection};
use crate::enums::{LightState, PhaseKind};

/// Traffic observed on one approach, as consumed by the fuzzy controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Vehicle density on a 0-100 scale.
    pub density: f64,
    /// Waiting time of the head vehicle in seconds (0-300).
    pub waiting_time: f64,
}

impl Observation {
    /// Create an observation from raw density and waiting time.
    pub const fn new(density: f64, waiting_time: f64) -> Self {
        Self {
            density,
            waiting_time,
        }
    }
}

/// Observations for all four approaches.
///
/// Produced each tick by the queue simulator or by a live-environment
/// bridge; the controller does not care which.
pub type TrafficState = PerDirection<Observation>;

/// One row of a controller's phase schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPhase {
    /// Which phase of the cycle this is.
    pub phase: PhaseKind,
    /// Start time in seconds, relative to the schedule origin.
    pub start_time: f64,
    /// Phase duration in seconds.
    pub duration: f64,
    /// Light shown to each approach during the phase.
    pub lights: PerDirection<LightState>,
}

impl ScheduledPhase {
    /// End time of the phase (`start_time + duration`).
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

/// A green-duration decision pushed to a live environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreenDecision {
    /// The direction whose axis receives the green.
    pub direction: Direction,
    /// Green duration in seconds.
    pub green_time: f64,
}

/// A recorded change of one approach's light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightChange {
    /// Simulation time of the change in seconds.
    pub time: f64,
    /// Approach whose light changed.
    pub direction: Direction,
    /// Previous light.
    pub from: LightState,
    /// New light.
    pub to: LightState,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn traffic_state_serializes_per_direction() {
        let state: TrafficState = PerDirection::new(
            Observation::new(75.0, 120.0),
            Observation::new(30.0, 45.0),
            Observation::new(50.0, 80.0),
            Observation::new(40.0, 60.0),
        );
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["north"]["density"], 75.0);
        assert_eq!(json["west"]["waiting_time"], 60.0);
    }

    #[test]
    fn scheduled_phase_end_time() {
        let row = ScheduledPhase {
            phase: PhaseKind::NsYellow,
            start_time: 40.0,
            duration: 3.0,
            lights: PhaseKind::NsYellow.lights(),
        };
        assert!((row.end_time() - 43.0).abs() < 1e-12);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["phase"], "NS_YELLOW");
        assert_eq!(json["lights"]["north"], "yellow");
    }
}
