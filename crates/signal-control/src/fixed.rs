//! Fixed-time baseline controller.
//!
//! Cycles through the six phases with constant durations regardless of
//! traffic. Time advances through [`FixedTimeController::step`]; when the
//! time spent in a phase reaches its duration the controller moves to the
//! next phase and restarts the phase clock at zero.

use signal_types::{Direction, LightState, PerDirection, PhaseKind, ScheduledPhase, TrafficState};
use tracing::{debug, info};

use crate::config::FixedTimingConfig;
use crate::controller::{ControlDecision, PhaseEntry, SignalController};
use crate::phase::{ControlError, Phase, schedule_from};

/// Fixed-time six-phase controller.
#[derive(Debug, Clone)]
pub struct FixedTimeController {
    phases: [Phase; 6],
    index: usize,
    time_in_phase: f64,
    last_control: Option<f64>,
}

impl FixedTimeController {
    /// Build the controller from phase timings.
    pub fn new(timing: &FixedTimingConfig) -> Result<Self, ControlError> {
        let phases = timing.cycle().build()?;
        let controller = Self {
            phases,
            index: 0,
            time_in_phase: 0.0,
            last_control: None,
        };
        info!(
            ns_green = timing.ns_green,
            ew_green = timing.ew_green,
            cycle = controller.cycle_duration(),
            "fixed-time controller initialized"
        );
        Ok(controller)
    }

    /// The phase currently shown.
    pub fn current(&self) -> &Phase {
        self.phase_at(self.index)
    }

    /// Seconds spent in the current phase.
    pub const fn time_in_phase(&self) -> f64 {
        self.time_in_phase
    }

    /// Light for every approach under the current phase.
    pub fn lights(&self) -> PerDirection<LightState> {
        self.current().lights()
    }

    /// Sum of all six phase durations.
    pub fn cycle_duration(&self) -> f64 {
        self.phases.iter().map(Phase::duration).sum()
    }

    /// Advance the phase clock by `dt` seconds.
    ///
    /// Returns the phase entered if a transition happened. At most one
    /// transition occurs per call and any overshoot is dropped.
    pub fn step(&mut self, dt: f64) -> Option<PhaseEntry> {
        self.time_in_phase += dt;
        let current = *self.current();
        if self.time_in_phase < current.duration() {
            return None;
        }
        self.index = next_index(self.index);
        self.time_in_phase = 0.0;
        let entered = *self.current();
        debug!(from = %current.kind(), to = %entered.kind(), "fixed phase change");
        Some(PhaseEntry {
            phase: entered.kind(),
            duration: entered.duration(),
        })
    }

    /// Seconds until `direction` next turns green.
    ///
    /// Counts the time left in the current phase plus the full durations of
    /// the phases in between. If the next green for `direction` is the
    /// current phase's next occurrence, the whole remaining cycle is
    /// counted, so the result never exceeds one cycle.
    pub fn time_until_next_green(&self, direction: Direction) -> f64 {
        let mut remaining = (self.current().duration() - self.time_in_phase).max(0.0);
        let mut index = next_index(self.index);
        for _ in 0..self.phases.len() {
            let phase = self.phase_at(index);
            if phase.is_green_for(direction) {
                return remaining;
            }
            remaining += phase.duration();
            index = next_index(index);
        }
        remaining
    }

    /// One full cycle starting at time zero.
    pub fn cycle_schedule(&self) -> Vec<ScheduledPhase> {
        schedule_from(&self.phases, 0.0)
    }

    /// Return to the start of the north-south green.
    pub const fn restart(&mut self) {
        self.index = 0;
        self.time_in_phase = 0.0;
        self.last_control = None;
    }

    fn phase_at(&self, index: usize) -> &Phase {
        // `index` is always produced by `next_index`, so it is in range.
        self.phases
            .get(index)
            .unwrap_or(&self.phases[0])
    }
}

const fn next_index(index: usize) -> usize {
    if index >= 5 { 0 } else { index.saturating_add(1) }
}

impl SignalController for FixedTimeController {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn control(&mut self, now: f64, _state: &TrafficState) -> ControlDecision {
        let entered = match self.last_control {
            None => Some(PhaseEntry {
                phase: self.current().kind(),
                duration: self.current().duration(),
            }),
            Some(previous) if now > previous => self.step(now - previous),
            Some(_) => None,
        };
        self.last_control = Some(now);
        ControlDecision {
            lights: self.lights(),
            entered,
        }
    }

    fn current_phase(&self) -> PhaseKind {
        self.current().kind()
    }

    fn schedule(&self, _state: &TrafficState) -> Vec<ScheduledPhase> {
        self.cycle_schedule()
    }

    fn reset(&mut self) {
        self.restart();
    }
}
