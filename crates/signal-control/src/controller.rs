//! The controller seam between the simulation loop and signal policies.
//!
//! The runner asks a [`SignalController`] for the lights to show at each
//! tick, applies them to the simulator, and records green-phase entries in
//! the metrics. Fixed-time and fuzzy policies both implement the trait, so
//! the loop is identical for both.

use serde::Serialize;
use signal_types::{LightState, PerDirection, PhaseKind, ScheduledPhase, TrafficState};

/// A phase the controller has just entered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseEntry {
    /// The new phase.
    pub phase: PhaseKind,
    /// Duration chosen for it, in seconds.
    pub duration: f64,
}

/// The controller's answer for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlDecision {
    /// Light to show on every approach.
    pub lights: PerDirection<LightState>,
    /// Set when a phase was entered at this tick, including the initial
    /// phase on the first call after construction or reset.
    pub entered: Option<PhaseEntry>,
}

/// A traffic-signal policy driven once per simulation tick.
pub trait SignalController {
    /// Short policy name for logs and reports.
    fn name(&self) -> &'static str;

    /// Decide the lights at simulation time `now` given the current
    /// observations. Called with non-decreasing `now`.
    fn control(&mut self, now: f64, state: &TrafficState) -> ControlDecision;

    /// The phase currently shown.
    fn current_phase(&self) -> PhaseKind;

    /// One full cycle as it would be scheduled under `state`.
    fn schedule(&self, state: &TrafficState) -> Vec<ScheduledPhase>;

    /// Return to the controller's initial state.
    fn reset(&mut self);
}
