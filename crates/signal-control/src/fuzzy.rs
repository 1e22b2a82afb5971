//! Adaptive controller driven by fuzzy inference.
//!
//! The controller walks the same six-phase cycle as the fixed-time
//! baseline, but chooses each green duration when it enters the green
//! phase: the mean of the inferred durations of the axis's two directions.
//! Yellow and all-red keep constant durations.
//!
//! When inference produces no output for a direction, the configured
//! fallback green time is used instead and a warning is logged. The other
//! directions are unaffected.

use signal_fuzzy::{Inference, InferenceEngine};
use signal_types::{Axis, Direction, PerDirection, PhaseKind, ScheduledPhase, TrafficState};
use tracing::{debug, info, warn};

use crate::config::FuzzyTimingConfig;
use crate::controller::{ControlDecision, PhaseEntry, SignalController};
use crate::phase::{ControlError, CycleTiming, Phase, schedule_from};

/// Where the controller is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ActivePhase {
    kind: PhaseKind,
    started_at: f64,
    duration: f64,
}

/// Fuzzy-logic adaptive controller.
#[derive(Debug, Clone)]
pub struct FuzzyController {
    engine: InferenceEngine,
    timing: FuzzyTimingConfig,
    active: Option<ActivePhase>,
    fallbacks: u64,
}

impl FuzzyController {
    /// Build a controller around `engine`.
    pub fn new(engine: InferenceEngine, timing: FuzzyTimingConfig) -> Result<Self, ControlError> {
        Phase::new(PhaseKind::NsYellow, timing.yellow)?;
        Phase::new(PhaseKind::AllRed1, timing.all_red)?;
        let fallback = timing.fallback_green_time;
        if !fallback.is_finite() || fallback <= 0.0 {
            return Err(ControlError::InvalidFallback { value: fallback });
        }
        info!(
            yellow = timing.yellow,
            all_red = timing.all_red,
            fallback_green_time = fallback,
            rules_per_direction = engine.rule_base(Direction::North).rules().len(),
            "fuzzy controller initialized"
        );
        Ok(Self {
            engine,
            timing,
            active: None,
            fallbacks: 0,
        })
    }

    /// The standard engine with the given timing.
    pub fn standard(timing: FuzzyTimingConfig) -> Result<Self, ControlError> {
        Self::new(InferenceEngine::standard(), timing)
    }

    /// The inference engine.
    pub const fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    /// How many times the fallback green time has been used.
    pub const fn fallback_count(&self) -> u64 {
        self.fallbacks
    }

    /// Inferred green time for one direction, or the fallback when
    /// inference fails.
    pub fn compute_green_time(&mut self, direction: Direction, state: &TrafficState) -> f64 {
        let (green, fell_back) = self.green_or_fallback(direction, state);
        if fell_back {
            self.fallbacks = self.fallbacks.saturating_add(1);
        }
        green
    }

    /// Green time for every direction. Does not count fallbacks.
    pub fn compute_all_green_times(&self, state: &TrafficState) -> PerDirection<f64> {
        PerDirection::from_fn(|direction| self.green_or_fallback(direction, state).0)
    }

    /// Mean green time of the two directions on `axis`.
    pub fn axis_green_time(&self, axis: Axis, state: &TrafficState) -> f64 {
        let [a, b] = axis.directions();
        f64::midpoint(
            self.green_or_fallback(a, state).0,
            self.green_or_fallback(b, state).0,
        )
    }

    /// Full inference trace for one direction.
    pub fn explain(&self, direction: Direction, state: &TrafficState) -> Inference {
        self.engine.explain(direction, state)
    }

    /// The cycle the controller would run if `state` held for a full cycle,
    /// starting at time zero.
    pub fn plan_cycle(&self, state: &TrafficState) -> Vec<ScheduledPhase> {
        let timing = CycleTiming {
            ns_green: self.axis_green_time(Axis::NorthSouth, state),
            ew_green: self.axis_green_time(Axis::EastWest, state),
            yellow: self.timing.yellow,
            all_red: self.timing.all_red,
        };
        match timing.build() {
            Ok(phases) => schedule_from(&phases, 0.0),
            Err(err) => {
                warn!(error = %err, "could not plan fuzzy cycle");
                Vec::new()
            }
        }
    }

    /// Length of the cycle [`FuzzyController::plan_cycle`] would produce.
    pub fn cycle_duration(&self, state: &TrafficState) -> f64 {
        self.plan_cycle(state).iter().map(|row| row.duration).sum()
    }

    fn green_or_fallback(&self, direction: Direction, state: &TrafficState) -> (f64, bool) {
        match self.engine.infer(direction, state) {
            Ok(green) => (green, false),
            Err(err) => {
                warn!(
                    direction = %direction,
                    error = %err,
                    fallback = self.timing.fallback_green_time,
                    "fuzzy inference failed; using fallback green time"
                );
                (self.timing.fallback_green_time, true)
            }
        }
    }

    fn enter(&mut self, kind: PhaseKind, now: f64, state: &TrafficState) -> PhaseEntry {
        let duration = match kind.green_axis() {
            Some(axis) => {
                let [a, b] = axis.directions();
                let first = self.compute_green_time(a, state);
                let second = self.compute_green_time(b, state);
                f64::midpoint(first, second)
            }
            None if matches!(kind, PhaseKind::NsYellow | PhaseKind::EwYellow) => {
                self.timing.yellow
            }
            None => self.timing.all_red,
        };
        debug!(phase = %kind, duration, time = now, "fuzzy phase change");
        self.active = Some(ActivePhase {
            kind,
            started_at: now,
            duration,
        });
        PhaseEntry {
            phase: kind,
            duration,
        }
    }
}

impl SignalController for FuzzyController {
    fn name(&self) -> &'static str {
        "fuzzy"
    }

    fn control(&mut self, now: f64, state: &TrafficState) -> ControlDecision {
        let entered = match self.active {
            None => Some(self.enter(PhaseKind::NsGreen, now, state)),
            Some(active) if now - active.started_at >= active.duration => {
                Some(self.enter(active.kind.next(), now, state))
            }
            Some(_) => None,
        };
        ControlDecision {
            lights: self.current_phase().lights(),
            entered,
        }
    }

    fn current_phase(&self) -> PhaseKind {
        self.active.map_or(PhaseKind::NsGreen, |active| active.kind)
    }

    fn schedule(&self, state: &TrafficState) -> Vec<ScheduledPhase> {
        self.plan_cycle(state)
    }

    fn reset(&mut self) {
        self.active = None;
        self.fallbacks = 0;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use signal_types::{LightState, Observation};

    use super::*;

    fn uniform(density: f64, waiting_time: f64) -> TrafficState {
        PerDirection::splat(Observation::new(density, waiting_time))
    }

    fn controller() -> FuzzyController {
        FuzzyController::standard(FuzzyTimingConfig::default()).unwrap()
    }

    #[test]
    fn starts_with_ns_green_at_first_tick() {
        let mut c = controller();
        let decision = c.control(0.0, &uniform(50.0, 100.0));
        let entry = decision.entered.unwrap();
        assert_eq!(entry.phase, PhaseKind::NsGreen);
        assert!((entry.duration - 40.0).abs() < 1e-6);
        assert_eq!(decision.lights.north, LightState::Green);
        assert_eq!(decision.lights.east, LightState::Red);
    }

    #[test]
    fn walks_the_cycle_with_constant_clearances() {
        let mut c = controller();
        let state = uniform(50.0, 100.0);
        let mut entries = Vec::new();
        for t in 0..=120 {
            if let Some(entry) = c.control(f64::from(t), &state).entered {
                entries.push((t, entry.phase));
            }
        }
        let phases: Vec<PhaseKind> = entries.iter().map(|&(_, p)| p).collect();
        assert_eq!(
            phases.get(..7),
            Some(
                &[
                    PhaseKind::NsGreen,
                    PhaseKind::NsYellow,
                    PhaseKind::AllRed1,
                    PhaseKind::EwGreen,
                    PhaseKind::EwYellow,
                    PhaseKind::AllRed2,
                    PhaseKind::NsGreen,
                ][..]
            )
        );
        let times: Vec<i32> = entries.iter().map(|&(t, _)| t).collect();
        // Greens last about 40 s on one-second ticks; clearances are exact.
        let gaps: Vec<i32> = times.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(matches!(gaps.first(), Some(40 | 41)));
        assert_eq!(gaps.get(1..3), Some(&[3, 2][..]));
        assert!(matches!(gaps.get(3), Some(40 | 41)));
        assert_eq!(gaps.get(4..6), Some(&[3, 2][..]));
    }

    #[test]
    fn green_duration_is_axis_mean() {
        let c = controller();
        let state = PerDirection::new(
            Observation::new(85.0, 150.0),
            Observation::new(30.0, 140.0),
            Observation::new(25.0, 30.0),
            Observation::new(20.0, 25.0),
        );
        let all = c.compute_all_green_times(&state);
        let ns = c.axis_green_time(Axis::NorthSouth, &state);
        assert!((ns - f64::midpoint(all.north, all.south)).abs() < 1e-12);
        let plan = c.plan_cycle(&state);
        assert_eq!(plan.len(), 6);
        assert!((plan.first().unwrap().duration - ns).abs() < 1e-12);
        let expected = ns + c.axis_green_time(Axis::EastWest, &state) + 10.0;
        assert!((c.cycle_duration(&state) - expected).abs() < 1e-9);
    }

    #[test]
    fn degenerate_inference_uses_fallback() {
        let timing = FuzzyTimingConfig {
            fallback_green_time: 33.0,
            ..FuzzyTimingConfig::default()
        };
        let mut c = FuzzyController::new(InferenceEngine::with_template(&[]), timing).unwrap();
        let entry = c.control(0.0, &uniform(50.0, 50.0)).entered.unwrap();
        assert!((entry.duration - 33.0).abs() < 1e-12);
        assert_eq!(c.fallback_count(), 2);
        c.reset();
        assert_eq!(c.fallback_count(), 0);
    }

    #[test]
    fn invalid_timing_is_rejected() {
        let timing = FuzzyTimingConfig {
            fallback_green_time: 0.0,
            ..FuzzyTimingConfig::default()
        };
        assert!(matches!(
            FuzzyController::standard(timing),
            Err(ControlError::InvalidFallback { .. })
        ));
        let timing = FuzzyTimingConfig {
            yellow: -1.0,
            ..FuzzyTimingConfig::default()
        };
        assert!(FuzzyController::standard(timing).is_err());
    }

    #[test]
    fn explain_matches_inference() {
        let c = controller();
        let state = uniform(0.0, 0.0);
        let trace = c.explain(Direction::West, &state);
        let all = c.compute_all_green_times(&state);
        assert_eq!(trace.green_time, Some(all.west));
    }
}
