//! Scenario runs and fuzzy-versus-fixed comparisons.
//!
//! [`run_scenario`] drives one controller over one scenario on a fresh
//! seeded simulator. Each tick it:
//!
//! 1. samples queue lengths into the metrics,
//! 2. asks the controller for the lights (recording green time on entry
//!    to a green phase),
//! 3. applies the lights and advances the simulator by one tick,
//! 4. records the tick's arrivals and departures.
//!
//! [`compare_scenario`] runs both controllers over the same scenario with
//! the same seed, so both see an identical arrival sequence.
//! [`compare_all`] does that for every configured scenario and stamps the
//! result with a run id.

use chrono::{DateTime, Utc};
use serde::Serialize;
use signal_queue::{QueueError, QueueSimulator, SimulatorStatistics};
use signal_types::ScheduledPhase;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::SimulationConfig;
use crate::controller::SignalController;
use crate::fixed::FixedTimeController;
use crate::fuzzy::FuzzyController;
use crate::metrics::{MetricsComparison, MetricsSummary, PerformanceMetrics};
use crate::phase::ControlError;
use crate::scenario::{Scenario, ScenarioError, ScenarioProvider};

/// Errors that can occur during a run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunnerError {
    /// The simulator rejected its configuration or a step.
    #[error("simulator error: {source}")]
    Queue {
        /// The underlying simulator error.
        #[from]
        source: QueueError,
    },

    /// A scenario could not be resolved.
    #[error("scenario error: {source}")]
    Scenario {
        /// The underlying scenario error.
        #[from]
        source: ScenarioError,
    },

    /// A controller could not be built from its timing.
    #[error("controller error: {source}")]
    Control {
        /// The underlying controller error.
        #[from]
        source: ControlError,
    },
}

/// Everything one controller run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Controller name.
    pub controller: &'static str,
    /// Scenario key.
    pub scenario: String,
    /// Raw metrics.
    pub metrics: PerformanceMetrics,
    /// Simulator totals at the end of the run.
    pub statistics: SimulatorStatistics,
    /// Number of individual light changes during the run.
    pub light_changes: usize,
    /// The controller's cycle under the final traffic state.
    pub schedule: Vec<ScheduledPhase>,
}

/// One scenario under both controllers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioComparison {
    /// Scenario key.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Simulated seconds per run.
    pub duration: f64,
    /// Fuzzy controller metrics.
    pub fuzzy: MetricsSummary,
    /// Fixed-time controller metrics.
    pub fixed: MetricsSummary,
    /// Fuzzy relative to fixed.
    pub comparison: MetricsComparison,
    /// Fuzzy cycle under the final traffic state.
    pub fuzzy_schedule: Vec<ScheduledPhase>,
    /// Fixed-time cycle.
    pub fixed_schedule: Vec<ScheduledPhase>,
}

/// A batch of comparisons with its run identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// Unique, time-ordered identifier for this batch.
    pub run_id: Uuid,
    /// Wall-clock start of the batch.
    pub started_at: DateTime<Utc>,
    /// Seed shared by every run.
    pub seed: u64,
    /// One entry per scenario, in run order.
    pub scenarios: Vec<ScenarioComparison>,
}

/// Simulated duration for `scenario` under the configured cap.
pub const fn effective_duration(scenario: &Scenario, config: &SimulationConfig) -> f64 {
    scenario.duration.min(config.simulation.max_duration)
}

/// Run `controller` over `scenario` on a fresh simulator.
///
/// The controller is reset first. The simulated duration is the scenario's
/// duration capped at `simulation.max_duration`.
///
/// # Errors
///
/// [`RunnerError::Queue`] if the simulator rejects the scenario's rates or
/// the configured tick.
pub fn run_scenario(
    scenario: &Scenario,
    controller: &mut dyn SignalController,
    config: &SimulationConfig,
) -> Result<RunOutcome, RunnerError> {
    let duration = effective_duration(scenario, config);
    let mut simulator = QueueSimulator::new(scenario.arrival_rates, config.queue_config())?;
    let mut metrics = PerformanceMetrics::new(duration);
    controller.reset();

    info!(
        scenario = %scenario.key,
        controller = controller.name(),
        duration,
        seed = config.simulation.seed,
        "scenario run starting"
    );

    while simulator.now() < duration {
        let now = simulator.now();
        let state = simulator.traffic_state();
        metrics.record_timestep(now, &simulator.queue_lengths());

        let decision = controller.control(now, &state);
        let green_entry = decision
            .entered
            .and_then(|entry| Some((entry.phase.green_axis()?, entry.duration)));
        if let Some((axis, green)) = green_entry {
            for direction in axis.directions() {
                metrics.record_green_time(direction, green);
            }
        }
        simulator.set_all_lights(&decision.lights);

        let report = simulator.tick()?;
        for (direction, &count) in report.arrivals.iter() {
            metrics.record_arrivals(direction, u64::from(count));
        }
        for vehicle in &report.departed {
            metrics.record_departure(vehicle.direction, vehicle.waiting_time());
        }
    }

    let statistics = simulator.statistics();
    let final_state = simulator.traffic_state();
    let outcome = RunOutcome {
        controller: controller.name(),
        scenario: scenario.key.clone(),
        light_changes: simulator.event_log().len(),
        schedule: controller.schedule(&final_state),
        metrics,
        statistics,
    };

    info!(
        scenario = %scenario.key,
        controller = outcome.controller,
        departures = outcome.metrics.total_departures(),
        avg_wait = outcome.metrics.average_waiting_time(),
        avg_queue = outcome.metrics.average_queue_length(),
        throughput_per_hour = outcome.metrics.throughput_per_hour(),
        fairness = outcome.metrics.fairness_index(),
        "scenario run finished"
    );
    Ok(outcome)
}

/// Run `scenario` under fresh fuzzy and fixed-time controllers with the
/// same seed.
///
/// # Errors
///
/// [`RunnerError::Control`] if either controller's timing is invalid,
/// [`RunnerError::Queue`] if a run fails.
pub fn compare_scenario(
    scenario: &Scenario,
    config: &SimulationConfig,
) -> Result<ScenarioComparison, RunnerError> {
    let mut fuzzy = FuzzyController::standard(config.fuzzy)?;
    let mut fixed = FixedTimeController::new(&config.fixed)?;

    let fuzzy_run = run_scenario(scenario, &mut fuzzy, config)?;
    if fuzzy.fallback_count() > 0 {
        warn!(
            scenario = %scenario.key,
            fallbacks = fuzzy.fallback_count(),
            "fuzzy controller used fallback green times"
        );
    }
    let fixed_run = run_scenario(scenario, &mut fixed, config)?;

    let comparison = fuzzy_run.metrics.compare_with(&fixed_run.metrics);
    info!(
        scenario = %scenario.key,
        waiting_time_improvement_pct = comparison.waiting_time_improvement_pct,
        queue_length_improvement_pct = comparison.queue_length_improvement_pct,
        throughput_improvement_pct = comparison.throughput_improvement_pct,
        fairness_improvement = comparison.fairness_improvement,
        "scenario comparison"
    );

    Ok(ScenarioComparison {
        key: scenario.key.clone(),
        name: scenario.name.clone(),
        description: scenario.description.clone(),
        duration: effective_duration(scenario, config),
        fuzzy: fuzzy_run.metrics.summary(),
        fixed: fixed_run.metrics.summary(),
        comparison,
        fuzzy_schedule: fuzzy_run.schedule,
        fixed_schedule: fixed_run.schedule,
    })
}

/// Compare both controllers on every scenario listed in
/// `simulation.scenarios`, or on every scenario `provider` knows when the
/// list is empty.
///
/// # Errors
///
/// [`RunnerError::Scenario`] for an unknown key, before any run starts;
/// otherwise the first run failure.
pub fn compare_all(
    provider: &dyn ScenarioProvider,
    config: &SimulationConfig,
) -> Result<ComparisonReport, RunnerError> {
    let keys = if config.simulation.scenarios.is_empty() {
        provider.keys()
    } else {
        config.simulation.scenarios.clone()
    };
    let scenarios = keys
        .iter()
        .map(|key| provider.scenario(key))
        .collect::<Result<Vec<_>, _>>()?;

    let report_id = Uuid::now_v7();
    let started_at = Utc::now();
    info!(
        run_id = %report_id,
        scenarios = scenarios.len(),
        seed = config.simulation.seed,
        "comparison batch starting"
    );

    let results = scenarios
        .into_iter()
        .map(|scenario| compare_scenario(scenario, config))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ComparisonReport {
        run_id: report_id,
        started_at,
        seed: config.simulation.seed,
        scenarios: results,
    })
}

/// Mean of the fuzzy controller's improvements over every scenario in
/// `report`. Zeroes when the report is empty.
pub fn average_improvement(report: &ComparisonReport) -> MetricsComparison {
    let mut total = MetricsComparison {
        waiting_time_improvement_pct: 0.0,
        queue_length_improvement_pct: 0.0,
        throughput_improvement_pct: 0.0,
        delay_reduction_pct: 0.0,
        fairness_improvement: 0.0,
    };
    if report.scenarios.is_empty() {
        return total;
    }
    for entry in &report.scenarios {
        let c = &entry.comparison;
        total.waiting_time_improvement_pct += c.waiting_time_improvement_pct;
        total.queue_length_improvement_pct += c.queue_length_improvement_pct;
        total.throughput_improvement_pct += c.throughput_improvement_pct;
        total.delay_reduction_pct += c.delay_reduction_pct;
        total.fairness_improvement += c.fairness_improvement;
    }
    let n = f64::from(u32::try_from(report.scenarios.len()).unwrap_or(u32::MAX));
    MetricsComparison {
        waiting_time_improvement_pct: total.waiting_time_improvement_pct / n,
        queue_length_improvement_pct: total.queue_length_improvement_pct / n,
        throughput_improvement_pct: total.throughput_improvement_pct / n,
        delay_reduction_pct: total.delay_reduction_pct / n,
        fairness_improvement: total.fairness_improvement / n,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use signal_types::{Direction, PhaseKind};

    use super::*;
    use crate::scenario::ScenarioCatalog;

    fn short_config(max_duration: f64) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.simulation.max_duration = max_duration;
        config
    }

    #[test]
    fn duration_is_capped() {
        let catalog = ScenarioCatalog::standard();
        let morning = catalog.get("morning").unwrap();
        assert!((effective_duration(morning, &SimulationConfig::default()) - 1800.0).abs() < 1e-12);
        assert!((effective_duration(morning, &short_config(9000.0)) - 7200.0).abs() < 1e-12);
    }

    #[test]
    fn fixed_run_samples_every_tick_and_records_greens() {
        let catalog = ScenarioCatalog::standard();
        let scenario = catalog.get("normal").unwrap();
        let config = short_config(180.0);
        let mut controller = FixedTimeController::new(&config.fixed).unwrap();
        let outcome = run_scenario(scenario, &mut controller, &config).unwrap();

        assert_eq!(outcome.controller, "fixed");
        assert_eq!(outcome.metrics.timestamps().len(), 180);
        // Two full 90 s cycles: NS green entered at 0 and 90, EW at 45 and 135.
        assert_eq!(outcome.metrics.direction(Direction::North).green_times().len(), 2);
        assert_eq!(outcome.metrics.direction(Direction::East).green_times().len(), 2);
        assert_eq!(outcome.schedule.first().map(|p| p.phase), Some(PhaseKind::NsGreen));
        assert_eq!(outcome.metrics.total_arrivals(), outcome.statistics.total_arrivals);
        assert_eq!(outcome.metrics.total_departures(), outcome.statistics.total_departures);
        assert!(outcome.light_changes > 0);
    }

    #[test]
    fn runs_are_reproducible() {
        let catalog = ScenarioCatalog::standard();
        let scenario = catalog.get("rush_ns").unwrap();
        let config = short_config(300.0);
        let mut a = FuzzyController::standard(config.fuzzy).unwrap();
        let mut b = FuzzyController::standard(config.fuzzy).unwrap();
        let first = run_scenario(scenario, &mut a, &config).unwrap();
        let second = run_scenario(scenario, &mut b, &config).unwrap();
        assert_eq!(first.metrics, second.metrics);
    }

    #[test]
    fn both_controllers_see_the_same_arrivals() {
        let catalog = ScenarioCatalog::standard();
        let scenario = catalog.get("asymmetric_north").unwrap();
        let result = compare_scenario(scenario, &short_config(600.0)).unwrap();
        assert_eq!(result.fuzzy.total_arrivals, result.fixed.total_arrivals);
        assert_eq!(result.fuzzy_schedule.len(), 6);
        assert_eq!(result.fixed_schedule.len(), 6);
        assert!((result.duration - 600.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_scenario_fails_before_running() {
        let mut config = short_config(60.0);
        config.simulation.scenarios = vec!["normal".to_owned(), "gridlock".to_owned()];
        let err = compare_all(&ScenarioCatalog::standard(), &config).unwrap_err();
        assert!(matches!(
            err,
            RunnerError::Scenario {
                source: ScenarioError::UnknownScenario { .. }
            }
        ));
    }

    #[test]
    fn average_of_empty_report_is_zero() {
        let report = ComparisonReport {
            run_id: Uuid::now_v7(),
            started_at: Utc::now(),
            seed: 42,
            scenarios: Vec::new(),
        };
        let avg = average_improvement(&report);
        assert!(avg.waiting_time_improvement_pct.abs() < 1e-12);
    }
}
