//! Performance metrics for a controller run.
//!
//! The accumulators keep raw samples only: per-direction waiting times of
//! departed vehicles, queue-length samples and green-time samples, plus the
//! intersection-wide queue history. Every aggregate is computed from those
//! samples on demand.
//!
//! # Fairness
//!
//! Jain's index over the per-direction average waiting times of the
//! directions that have had at least one departure:
//! `(sum x)^2 / (n * sum x^2)`. It is 1.0 when fewer than two directions
//! qualify or when every average is zero.

use serde::Serialize;
use signal_types::{Direction, PerDirection};

/// Seconds per hour.
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Convert a count to `f64`, saturating at `u32::MAX`.
fn count_to_f64(count: usize) -> f64 {
    f64::from(u32::try_from(count).unwrap_or(u32::MAX))
}

#[allow(clippy::cast_precision_loss)]
const fn u64_to_f64(value: u64) -> f64 {
    value as f64
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / count_to_f64(values.len())
    }
}

fn mean_count(values: &[usize]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        let total: f64 = values.iter().map(|&v| count_to_f64(v)).sum();
        total / count_to_f64(values.len())
    }
}

// ---------------------------------------------------------------------------
// Per-direction accumulator
// ---------------------------------------------------------------------------

/// Raw samples for one approach.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectionMetrics {
    arrivals: u64,
    departures: u64,
    waiting_times: Vec<f64>,
    queue_lengths: Vec<usize>,
    green_times: Vec<f64>,
}

impl DirectionMetrics {
    /// Vehicles that arrived.
    pub const fn arrivals(&self) -> u64 {
        self.arrivals
    }

    /// Vehicles that departed.
    pub const fn departures(&self) -> u64 {
        self.departures
    }

    /// Waiting time of every departed vehicle.
    pub fn waiting_times(&self) -> &[f64] {
        &self.waiting_times
    }

    /// Queue-length samples, one per recorded timestep.
    pub fn queue_lengths(&self) -> &[usize] {
        &self.queue_lengths
    }

    /// Green durations granted to this approach.
    pub fn green_times(&self) -> &[f64] {
        &self.green_times
    }

    /// Mean waiting time of departed vehicles, 0 when none.
    pub fn average_waiting_time(&self) -> f64 {
        mean(&self.waiting_times)
    }

    /// Longest waiting time, 0 when none.
    pub fn max_waiting_time(&self) -> f64 {
        self.waiting_times.iter().copied().fold(0.0, f64::max)
    }

    /// Mean queue length over the samples.
    pub fn average_queue_length(&self) -> f64 {
        mean_count(&self.queue_lengths)
    }

    /// Longest sampled queue.
    pub fn max_queue_length(&self) -> usize {
        self.queue_lengths.iter().copied().max().unwrap_or(0)
    }

    /// Sum of waiting times.
    pub fn total_delay(&self) -> f64 {
        self.waiting_times.iter().sum()
    }

    /// Mean granted green duration, 0 when none.
    pub fn average_green_time(&self) -> f64 {
        mean(&self.green_times)
    }

    fn summary(&self) -> DirectionSummary {
        DirectionSummary {
            arrivals: self.arrivals,
            departures: self.departures,
            avg_waiting_time: self.average_waiting_time(),
            max_waiting_time: self.max_waiting_time(),
            avg_queue_length: self.average_queue_length(),
            max_queue_length: self.max_queue_length(),
            total_delay: self.total_delay(),
            throughput: self.departures,
            avg_green_time: self.average_green_time(),
        }
    }
}

// ---------------------------------------------------------------------------
// Whole-run accumulator
// ---------------------------------------------------------------------------

/// Metrics for one controller run over one scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetrics {
    simulation_duration: f64,
    directions: PerDirection<DirectionMetrics>,
    timestamps: Vec<f64>,
    total_queue_history: Vec<usize>,
}

impl PerformanceMetrics {
    /// Empty metrics for a run of `simulation_duration` seconds.
    pub fn new(simulation_duration: f64) -> Self {
        Self {
            simulation_duration,
            directions: PerDirection::default(),
            timestamps: Vec::new(),
            total_queue_history: Vec::new(),
        }
    }

    /// Simulated duration in seconds.
    pub const fn simulation_duration(&self) -> f64 {
        self.simulation_duration
    }

    /// Samples for one approach.
    pub const fn direction(&self, direction: Direction) -> &DirectionMetrics {
        self.directions.get(direction)
    }

    /// Times at which queue samples were taken.
    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// Intersection-wide queue length per sample.
    pub fn total_queue_history(&self) -> &[usize] {
        &self.total_queue_history
    }

    // -----------------------------------------------------------------------
    // Recording
    // -----------------------------------------------------------------------

    /// Sample queue lengths at `timestamp`.
    pub fn record_timestep(&mut self, timestamp: f64, queue_lengths: &PerDirection<usize>) {
        self.timestamps.push(timestamp);
        let mut total: usize = 0;
        for (direction, &len) in queue_lengths.iter() {
            self.directions.get_mut(direction).queue_lengths.push(len);
            total = total.saturating_add(len);
        }
        self.total_queue_history.push(total);
    }

    /// Record one departed vehicle.
    pub fn record_departure(&mut self, direction: Direction, waiting_time: f64) {
        let metrics = self.directions.get_mut(direction);
        metrics.waiting_times.push(waiting_time);
        metrics.departures = metrics.departures.saturating_add(1);
    }

    /// Record one arrival.
    pub fn record_arrival(&mut self, direction: Direction) {
        self.record_arrivals(direction, 1);
    }

    /// Record `count` arrivals.
    pub fn record_arrivals(&mut self, direction: Direction, count: u64) {
        let metrics = self.directions.get_mut(direction);
        metrics.arrivals = metrics.arrivals.saturating_add(count);
    }

    /// Record a green duration granted to `direction`.
    pub fn record_green_time(&mut self, direction: Direction, duration: f64) {
        self.directions.get_mut(direction).green_times.push(duration);
    }

    // -----------------------------------------------------------------------
    // Aggregates
    // -----------------------------------------------------------------------

    /// Arrivals over all approaches.
    pub fn total_arrivals(&self) -> u64 {
        self.directions
            .iter()
            .fold(0_u64, |acc, (_, d)| acc.saturating_add(d.arrivals))
    }

    /// Departures over all approaches.
    pub fn total_departures(&self) -> u64 {
        self.directions
            .iter()
            .fold(0_u64, |acc, (_, d)| acc.saturating_add(d.departures))
    }

    /// Arrived but not yet departed.
    pub fn vehicles_in_system(&self) -> u64 {
        self.total_arrivals().saturating_sub(self.total_departures())
    }

    /// Mean waiting time over every departed vehicle.
    pub fn average_waiting_time(&self) -> f64 {
        let (sum, count) = self
            .directions
            .iter()
            .fold((0.0, 0_usize), |(sum, count), (_, d)| {
                (
                    sum + d.total_delay(),
                    count.saturating_add(d.waiting_times.len()),
                )
            });
        if count == 0 { 0.0 } else { sum / count_to_f64(count) }
    }

    /// Longest waiting time of any vehicle.
    pub fn max_waiting_time(&self) -> f64 {
        self.directions
            .iter()
            .map(|(_, d)| d.max_waiting_time())
            .fold(0.0, f64::max)
    }

    /// Sum of all waiting times.
    pub fn total_delay(&self) -> f64 {
        self.directions.iter().map(|(_, d)| d.total_delay()).sum()
    }

    /// Mean intersection-wide queue length.
    pub fn average_queue_length(&self) -> f64 {
        mean_count(&self.total_queue_history)
    }

    /// Longest intersection-wide queue.
    pub fn max_queue_length(&self) -> usize {
        self.total_queue_history.iter().copied().max().unwrap_or(0)
    }

    /// Departures per simulated hour.
    pub fn throughput_per_hour(&self) -> f64 {
        let hours = self.simulation_duration / SECONDS_PER_HOUR;
        if hours > 0.0 {
            u64_to_f64(self.total_departures()) / hours
        } else {
            0.0
        }
    }

    /// Jain's fairness index over per-direction average waits.
    pub fn fairness_index(&self) -> f64 {
        let averages: Vec<f64> = self
            .directions
            .iter()
            .filter(|(_, d)| d.departures > 0)
            .map(|(_, d)| d.average_waiting_time())
            .collect();
        jain_index(&averages)
    }

    /// Fraction of samples with at least one queued vehicle.
    pub fn utilization_rate(&self) -> f64 {
        if self.total_queue_history.is_empty() {
            return 0.0;
        }
        let busy = self.total_queue_history.iter().filter(|&&q| q > 0).count();
        count_to_f64(busy) / count_to_f64(self.total_queue_history.len())
    }

    /// All aggregates plus the per-direction breakdown.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            simulation_duration: self.simulation_duration,
            total_arrivals: self.total_arrivals(),
            total_departures: self.total_departures(),
            vehicles_in_system: self.vehicles_in_system(),
            average_waiting_time: self.average_waiting_time(),
            max_waiting_time: self.max_waiting_time(),
            total_delay: self.total_delay(),
            average_queue_length: self.average_queue_length(),
            max_queue_length: self.max_queue_length(),
            throughput_per_hour: self.throughput_per_hour(),
            fairness_index: self.fairness_index(),
            utilization_rate: self.utilization_rate(),
            by_direction: self.directions.map(|_, d| d.summary()),
        }
    }

    /// Improvements of `self` over `baseline`. Positive means `self` is
    /// better; a zero baseline gives 0 for that entry.
    pub fn compare_with(&self, baseline: &Self) -> MetricsComparison {
        MetricsComparison {
            waiting_time_improvement_pct: reduction_pct(
                baseline.average_waiting_time(),
                self.average_waiting_time(),
            ),
            queue_length_improvement_pct: reduction_pct(
                baseline.average_queue_length(),
                self.average_queue_length(),
            ),
            throughput_improvement_pct: increase_pct(
                baseline.throughput_per_hour(),
                self.throughput_per_hour(),
            ),
            delay_reduction_pct: reduction_pct(baseline.total_delay(), self.total_delay()),
            fairness_improvement: self.fairness_index() - baseline.fairness_index(),
        }
    }
}

/// Jain's fairness index of `values`; 1.0 for fewer than two values or an
/// all-zero input.
pub fn jain_index(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 1.0;
    }
    let sum: f64 = values.iter().sum();
    let sum_sq: f64 = values.iter().map(|x| x * x).sum();
    if sum_sq <= 0.0 {
        return 1.0;
    }
    (sum * sum) / (count_to_f64(values.len()) * sum_sq)
}

fn reduction_pct(baseline: f64, value: f64) -> f64 {
    if baseline > 0.0 {
        (baseline - value) / baseline * 100.0
    } else {
        0.0
    }
}

fn increase_pct(baseline: f64, value: f64) -> f64 {
    if baseline > 0.0 {
        (value - baseline) / baseline * 100.0
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Reporting shapes
// ---------------------------------------------------------------------------

/// Per-direction breakdown in a [`MetricsSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectionSummary {
    /// Vehicles that arrived.
    pub arrivals: u64,
    /// Vehicles that departed.
    pub departures: u64,
    /// Mean waiting time in seconds.
    pub avg_waiting_time: f64,
    /// Longest waiting time in seconds.
    pub max_waiting_time: f64,
    /// Mean queue length.
    pub avg_queue_length: f64,
    /// Longest queue.
    pub max_queue_length: usize,
    /// Sum of waiting times in seconds.
    pub total_delay: f64,
    /// Vehicles processed.
    pub throughput: u64,
    /// Mean granted green duration in seconds.
    pub avg_green_time: f64,
}

/// Flat named aggregates plus a per-direction breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    /// Simulated duration in seconds.
    pub simulation_duration: f64,
    /// Vehicles that arrived.
    pub total_arrivals: u64,
    /// Vehicles that departed.
    pub total_departures: u64,
    /// Vehicles still waiting at the end.
    pub vehicles_in_system: u64,
    /// Mean waiting time in seconds.
    pub average_waiting_time: f64,
    /// Longest waiting time in seconds.
    pub max_waiting_time: f64,
    /// Sum of waiting times in seconds.
    pub total_delay: f64,
    /// Mean intersection-wide queue length.
    pub average_queue_length: f64,
    /// Longest intersection-wide queue.
    pub max_queue_length: usize,
    /// Departures per simulated hour.
    pub throughput_per_hour: f64,
    /// Jain's fairness index over per-direction average waits.
    pub fairness_index: f64,
    /// Fraction of samples with a non-empty intersection.
    pub utilization_rate: f64,
    /// Per-direction breakdown.
    pub by_direction: PerDirection<DirectionSummary>,
}

/// Relative performance of one run against a baseline run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsComparison {
    /// Average waiting time reduction, percent.
    pub waiting_time_improvement_pct: f64,
    /// Average queue length reduction, percent.
    pub queue_length_improvement_pct: f64,
    /// Throughput increase, percent.
    pub throughput_improvement_pct: f64,
    /// Total delay reduction, percent.
    pub delay_reduction_pct: f64,
    /// Fairness index difference (run minus baseline).
    pub fairness_improvement: f64,
}
