//! Live-environment bridge.
//!
//! A [`TrafficEnvironment`] is anything that can report per-direction
//! observations and accept a green-duration decision: the internal queue
//! simulator, or an external microscopic simulator behind an adapter.
//! Inference does not care which one feeds it.
//!
//! [`drive_environment`] is the bridge loop: it alternates between the two
//! axes, observes, infers the lead direction's green, pushes it, and lets
//! the environment run for that long.

use signal_queue::{QueueError, QueueSimulator};
use signal_types::{Axis, GreenDecision, LightState, PerDirection, TrafficState};
use tracing::{debug, info};

use crate::fuzzy::FuzzyController;

/// Errors raised by an environment.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnvironmentError {
    /// The environment cannot be reached or refused the request.
    #[error("environment unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },

    /// The internal simulator rejected a step.
    #[error("queue simulator error: {source}")]
    Queue {
        /// The underlying simulator error.
        #[from]
        source: QueueError,
    },
}

/// A source of observations and a sink for green decisions.
pub trait TrafficEnvironment {
    /// Current density and waiting time for every approach.
    ///
    /// # Errors
    ///
    /// [`EnvironmentError`] if the environment cannot be read.
    fn observe(&mut self) -> Result<TrafficState, EnvironmentError>;

    /// Give `decision.direction`'s axis the green for `decision.green_time`
    /// seconds.
    ///
    /// # Errors
    ///
    /// [`EnvironmentError`] if the decision cannot be applied.
    fn apply(&mut self, decision: GreenDecision) -> Result<(), EnvironmentError>;

    /// Let `seconds` of simulated time pass.
    ///
    /// # Errors
    ///
    /// [`EnvironmentError`] if the environment fails to advance.
    fn advance(&mut self, seconds: f64) -> Result<(), EnvironmentError>;

    /// Current simulated time in seconds.
    fn now(&self) -> f64;
}

/// [`TrafficEnvironment`] over the internal [`QueueSimulator`].
#[derive(Debug, Clone)]
pub struct QueueEnvironment {
    simulator: QueueSimulator,
    departed: u64,
}

impl QueueEnvironment {
    /// Wrap a simulator.
    pub const fn new(simulator: QueueSimulator) -> Self {
        Self {
            simulator,
            departed: 0,
        }
    }

    /// The wrapped simulator.
    pub const fn simulator(&self) -> &QueueSimulator {
        &self.simulator
    }

    /// Vehicles that left while this environment was advancing.
    pub const fn departed(&self) -> u64 {
        self.departed
    }

    /// Unwrap the simulator.
    pub fn into_inner(self) -> QueueSimulator {
        self.simulator
    }
}

impl TrafficEnvironment for QueueEnvironment {
    fn observe(&mut self) -> Result<TrafficState, EnvironmentError> {
        Ok(self.simulator.traffic_state())
    }

    fn apply(&mut self, decision: GreenDecision) -> Result<(), EnvironmentError> {
        let axis = decision.direction.axis();
        let lights = PerDirection::from_fn(|d| {
            if d.axis() == axis {
                LightState::Green
            } else {
                LightState::Red
            }
        });
        self.simulator.set_all_lights(&lights);
        Ok(())
    }

    fn advance(&mut self, seconds: f64) -> Result<(), EnvironmentError> {
        let step = self.simulator.config().time_step;
        let mut remaining = seconds;
        while remaining > 0.0 {
            let dt = remaining.min(step);
            let report = self.simulator.step(dt)?;
            let count = u64::try_from(report.departed.len()).unwrap_or(u64::MAX);
            self.departed = self.departed.saturating_add(count);
            remaining -= dt;
        }
        Ok(())
    }

    fn now(&self) -> f64 {
        self.simulator.now()
    }
}

/// Alternate axes for `duration` seconds, starting with north-south.
///
/// Each round observes the environment, infers the green time of the
/// axis's lead direction (north or east), truncates it to whole seconds,
/// pushes it, and advances by that much. Returns every decision pushed.
///
/// # Errors
///
/// The first [`EnvironmentError`] the environment reports.
pub fn drive_environment(
    environment: &mut dyn TrafficEnvironment,
    controller: &mut FuzzyController,
    duration: f64,
) -> Result<Vec<GreenDecision>, EnvironmentError> {
    let end = environment.now() + duration;
    let mut axis = Axis::NorthSouth;
    let mut decisions = Vec::new();
    info!(duration, "driving environment");

    while environment.now() < end {
        let [lead, _] = axis.directions();
        let state = environment.observe()?;
        let green = controller.compute_green_time(lead, &state).floor().max(1.0);
        let decision = GreenDecision {
            direction: lead,
            green_time: green,
        };
        debug!(
            time = environment.now(),
            direction = %lead,
            green_time = green,
            density = state.get(lead).density,
            waiting_time = state.get(lead).waiting_time,
            "green decision"
        );
        environment.apply(decision)?;
        environment.advance(green)?;
        decisions.push(decision);
        axis = axis.other();
    }

    info!(
        decisions = decisions.len(),
        end_time = environment.now(),
        "environment drive finished"
    );
    Ok(decisions)
}
