//! Per-direction queue state.

use std::collections::VecDeque;

use serde::Serialize;
use signal_types::{Direction, LightState, Observation};

use crate::vehicle::{DepartedVehicle, Vehicle};

/// Density added per queued vehicle.
pub const DENSITY_PER_VEHICLE: f64 = 2.0;

/// Density reported for a queue of `DENSITY_MAX / DENSITY_PER_VEHICLE` or
/// more vehicles.
pub const DENSITY_MAX: f64 = 100.0;

/// Cap on the reported head-of-queue waiting time, in seconds.
pub const WAITING_CAP: f64 = 300.0;

/// Convert a count to `f64`, saturating at `u32::MAX`.
pub(crate) fn count_to_f64(count: usize) -> f64 {
    f64::from(u32::try_from(count).unwrap_or(u32::MAX))
}

/// One approach: its FIFO queue, light and running totals.
#[derive(Debug, Clone)]
pub struct Approach {
    direction: Direction,
    queue: VecDeque<Vehicle>,
    light: LightState,
    arrivals: u64,
    departures: u64,
    total_waiting: f64,
    arrival_rate: f64,
}

/// Snapshot of one approach for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ApproachStatistics {
    /// Vehicles that have arrived.
    pub arrivals: u64,
    /// Vehicles that have departed.
    pub departures: u64,
    /// Vehicles currently queued.
    pub queue_length: usize,
    /// Sum of waiting times of departed vehicles.
    pub total_waiting_time: f64,
    /// Mean waiting time of departed vehicles, 0 when none departed.
    pub average_waiting_time: f64,
    /// Current light.
    pub light: LightState,
    /// Configured arrival rate, vehicles per minute.
    pub arrival_rate: f64,
}

impl Approach {
    /// An empty, red approach with the given arrival rate.
    pub const fn new(direction: Direction, arrival_rate: f64) -> Self {
        Self {
            direction,
            queue: VecDeque::new(),
            light: LightState::Red,
            arrivals: 0,
            departures: 0,
            total_waiting: 0.0,
            arrival_rate,
        }
    }

    /// The approach's direction.
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Current light.
    pub const fn light(&self) -> LightState {
        self.light
    }

    /// Arrival rate in vehicles per minute.
    pub const fn arrival_rate(&self) -> f64 {
        self.arrival_rate
    }

    /// Vehicles currently queued.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// The vehicle at the stop line, if any.
    pub fn head(&self) -> Option<&Vehicle> {
        self.queue.front()
    }

    /// Cumulative arrivals.
    pub const fn arrivals(&self) -> u64 {
        self.arrivals
    }

    /// Cumulative departures.
    pub const fn departures(&self) -> u64 {
        self.departures
    }

    /// Cumulative waiting time of departed vehicles.
    pub const fn total_waiting(&self) -> f64 {
        self.total_waiting
    }

    /// Mean waiting time of departed vehicles, or 0.
    pub fn average_waiting(&self) -> f64 {
        if self.departures == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let departed = self.departures as f64;
        self.total_waiting / departed
    }

    /// Controller-facing view at `now`: density proxy and head wait.
    pub fn observation(&self, now: f64) -> Observation {
        let density = (count_to_f64(self.queue.len()) * DENSITY_PER_VEHICLE).min(DENSITY_MAX);
        let waiting_time = self
            .head()
            .map_or(0.0, |head| head.waited(now).min(WAITING_CAP));
        Observation::new(density, waiting_time)
    }

    /// Snapshot for reporting.
    pub fn statistics(&self) -> ApproachStatistics {
        ApproachStatistics {
            arrivals: self.arrivals,
            departures: self.departures,
            queue_length: self.queue.len(),
            total_waiting_time: self.total_waiting,
            average_waiting_time: self.average_waiting(),
            light: self.light,
            arrival_rate: self.arrival_rate,
        }
    }

    pub(crate) const fn set_light(&mut self, light: LightState) -> LightState {
        std::mem::replace(&mut self.light, light)
    }

    pub(crate) const fn set_arrival_rate(&mut self, rate: f64) {
        self.arrival_rate = rate;
    }

    pub(crate) fn enqueue(&mut self, vehicle: Vehicle) {
        self.queue.push_back(vehicle);
        self.arrivals = self.arrivals.saturating_add(1);
    }

    /// Pop up to `max` vehicles if the light is green, stamping `now`.
    pub(crate) fn discharge(&mut self, max: usize, now: f64) -> Vec<DepartedVehicle> {
        if self.light != LightState::Green {
            return Vec::new();
        }
        let count = max.min(self.queue.len());
        let departed: Vec<DepartedVehicle> = self
            .queue
            .drain(..count)
            .map(|vehicle| vehicle.depart(now))
            .collect();
        for vehicle in &departed {
            self.total_waiting += vehicle.waiting_time();
            self.departures = self.departures.saturating_add(1);
        }
        departed
    }

    pub(crate) fn clear(&mut self) {
        self.queue.clear();
        self.light = LightState::Red;
        self.arrivals = 0;
        self.departures = 0;
        self.total_waiting = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::VehicleId;

    fn queued(n: u64, at: f64) -> Approach {
        let mut approach = Approach::new(Direction::North, 12.0);
        for i in 0..n {
            approach.enqueue(Vehicle {
                id: VehicleId(i),
                direction: Direction::North,
                arrival_time: at,
            });
        }
        approach
    }

    #[test]
    fn observation_caps_density_and_wait() {
        let approach = queued(70, 0.0);
        let obs = approach.observation(500.0);
        assert!((obs.density - 100.0).abs() < 1e-12);
        assert!((obs.waiting_time - 300.0).abs() < 1e-12);

        let small = queued(3, 10.0);
        let obs = small.observation(25.0);
        assert!((obs.density - 6.0).abs() < 1e-12);
        assert!((obs.waiting_time - 15.0).abs() < 1e-12);
    }

    #[test]
    fn empty_queue_reports_zero_wait() {
        let obs = Approach::new(Direction::West, 0.0).observation(99.0);
        assert!(obs.density.abs() < 1e-12);
        assert!(obs.waiting_time.abs() < 1e-12);
    }

    #[test]
    fn only_green_discharges() {
        let mut approach = queued(5, 0.0);
        assert!(approach.discharge(2, 10.0).is_empty());
        approach.set_light(LightState::Yellow);
        assert!(approach.discharge(2, 10.0).is_empty());
        approach.set_light(LightState::Green);
        let departed = approach.discharge(2, 10.0);
        assert_eq!(departed.len(), 2);
        assert_eq!(approach.queue_len(), 3);
        assert_eq!(approach.departures(), 2);
        assert!((approach.average_waiting() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn discharge_is_fifo_and_bounded_by_queue() {
        let mut approach = queued(3, 0.0);
        approach.set_light(LightState::Green);
        let departed = approach.discharge(10, 4.0);
        let ids: Vec<u64> = departed.iter().map(|v| v.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(approach.queue_len(), 0);
    }
}
