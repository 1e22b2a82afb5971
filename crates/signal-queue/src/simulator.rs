//! The discrete-time intersection queue simulator.
//!
//! # Tick order
//!
//! Every [`QueueSimulator::step`] of length `dt`:
//!
//! 1. **Arrivals** -- each approach draws Poisson(`rate / 60 * dt`) new
//!    vehicles, stamped with the current time.
//! 2. **Departures** -- each GREEN approach releases up to
//!    `floor(dt / departure_interval)` vehicles from the head of its queue,
//!    stamped with the current time. YELLOW and RED release nothing.
//! 3. **Clock** -- simulation time advances by `dt`.
//!
//! The simulator has no phase logic. Lights change only through
//! [`QueueSimulator::set_light_state`] and [`QueueSimulator::set_all_lights`].

use serde::Serialize;
use signal_types::{Direction, LightChange, LightState, PerDirection, TrafficState};
use tracing::debug;

use crate::approach::{Approach, ApproachStatistics};
use crate::arrivals::ArrivalSampler;
use crate::error::QueueError;
use crate::vehicle::{DepartedVehicle, Vehicle, VehicleId};

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 42;

/// Default tick length in seconds.
pub const DEFAULT_TIME_STEP: f64 = 1.0;

/// Default saturation headway in seconds.
pub const DEFAULT_DEPARTURE_INTERVAL: f64 = 0.5;

/// Static simulator settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueueConfig {
    /// RNG seed for arrivals.
    pub seed: u64,
    /// Tick length used by [`QueueSimulator::tick`], in seconds.
    pub time_step: f64,
    /// Seconds between departures from one green approach.
    pub departure_interval: f64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            time_step: DEFAULT_TIME_STEP,
            departure_interval: DEFAULT_DEPARTURE_INTERVAL,
        }
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// Simulation time at the start of the tick.
    pub time: f64,
    /// Tick length.
    pub dt: f64,
    /// New vehicles per approach.
    pub arrivals: PerDirection<u32>,
    /// Vehicles that departed, in approach order.
    pub departed: Vec<DepartedVehicle>,
}

impl StepReport {
    /// Departures for one approach.
    pub fn departures_from(&self, direction: Direction) -> impl Iterator<Item = &DepartedVehicle> {
        self.departed.iter().filter(move |v| v.direction == direction)
    }
}

/// Whole-intersection snapshot for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatorStatistics {
    /// Current simulation time in seconds.
    pub simulation_time: f64,
    /// Vehicles that have arrived on any approach.
    pub total_arrivals: u64,
    /// Vehicles that have departed from any approach.
    pub total_departures: u64,
    /// Vehicles still queued.
    pub vehicles_in_system: usize,
    /// Sum of queue lengths (same as `vehicles_in_system`).
    pub total_queue_length: usize,
    /// Mean waiting time over all departed vehicles.
    pub average_waiting_time: f64,
    /// Per-approach breakdown.
    pub by_direction: PerDirection<ApproachStatistics>,
}

/// Seeded, single-threaded queue simulator for one intersection.
#[derive(Debug, Clone)]
pub struct QueueSimulator {
    config: QueueConfig,
    approaches: PerDirection<Approach>,
    sampler: ArrivalSampler,
    now: f64,
    next_id: u64,
    events: Vec<LightChange>,
}

impl QueueSimulator {
    /// Create a simulator with all lights red and empty queues.
    ///
    /// `rates` are vehicles per minute per approach.
    pub fn new(rates: PerDirection<f64>, config: QueueConfig) -> Result<Self, QueueError> {
        validate_step(config.time_step)?;
        if !config.departure_interval.is_finite() || config.departure_interval <= 0.0 {
            return Err(QueueError::InvalidDepartureInterval {
                value: config.departure_interval,
            });
        }
        for (direction, &rate) in rates.iter() {
            validate_rate(direction, rate)?;
        }
        Ok(Self {
            config,
            approaches: rates.map(|direction, &rate| Approach::new(direction, rate)),
            sampler: ArrivalSampler::new(config.seed),
            now: 0.0,
            next_id: 0,
            events: Vec::new(),
        })
    }

    /// The configuration the simulator was built with.
    pub const fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Current simulation time in seconds.
    pub const fn now(&self) -> f64 {
        self.now
    }

    /// Read-only view of one approach.
    pub const fn approach(&self, direction: Direction) -> &Approach {
        self.approaches.get(direction)
    }

    /// Change the arrival rate of one approach.
    pub fn set_arrival_rate(&mut self, direction: Direction, rate: f64) -> Result<(), QueueError> {
        validate_rate(direction, rate)?;
        self.approaches.get_mut(direction).set_arrival_rate(rate);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lights
    // -----------------------------------------------------------------------

    /// Current light of one approach.
    pub const fn light_state(&self, direction: Direction) -> LightState {
        self.approaches.get(direction).light()
    }

    /// Lights of all approaches.
    pub fn lights(&self) -> PerDirection<LightState> {
        self.approaches.map(|_, approach| approach.light())
    }

    /// Set one approach's light. Actual changes are recorded in the event log.
    pub fn set_light_state(&mut self, direction: Direction, light: LightState) {
        let previous = self.approaches.get_mut(direction).set_light(light);
        if previous != light {
            debug!(
                time = self.now,
                direction = %direction,
                from = %previous,
                to = %light,
                "light change"
            );
            self.events.push(LightChange {
                time: self.now,
                direction,
                from: previous,
                to: light,
            });
        }
    }

    /// Set one approach's light by name.
    ///
    /// An unknown name is rejected before any state changes.
    pub fn set_light_state_by_name(&mut self, name: &str, light: LightState) -> Result<(), QueueError> {
        let direction: Direction = name.parse()?;
        self.set_light_state(direction, light);
        Ok(())
    }

    /// Set every approach's light.
    pub fn set_all_lights(&mut self, lights: &PerDirection<LightState>) {
        for (direction, &light) in lights.iter() {
            self.set_light_state(direction, light);
        }
    }

    /// Every light change so far, oldest first.
    pub fn event_log(&self) -> &[LightChange] {
        &self.events
    }

    // -----------------------------------------------------------------------
    // Stepping
    // -----------------------------------------------------------------------

    /// Sample and enqueue arrivals for a tick of length `dt` at the current
    /// time. Returns the count per approach.
    pub fn generate_arrivals(&mut self, dt: f64) -> Result<PerDirection<u32>, QueueError> {
        validate_step(dt)?;
        let now = self.now;
        let mut counts = PerDirection::splat(0_u32);
        for direction in Direction::ALL {
            let mean = self.approaches.get(direction).arrival_rate() / 60.0 * dt;
            let count = self.sampler.poisson(mean);
            for _ in 0..count {
                let id = VehicleId(self.next_id);
                self.next_id = self.next_id.saturating_add(1);
                self.approaches.get_mut(direction).enqueue(Vehicle {
                    id,
                    direction,
                    arrival_time: now,
                });
            }
            *counts.get_mut(direction) = count;
        }
        Ok(counts)
    }

    /// Release vehicles from green approaches for a tick of length `dt`.
    pub fn process_departures(&mut self, dt: f64) -> Result<Vec<DepartedVehicle>, QueueError> {
        validate_step(dt)?;
        let slots = departure_slots(dt, self.config.departure_interval);
        let now = self.now;
        let mut departed = Vec::new();
        for direction in Direction::ALL {
            departed.extend(self.approaches.get_mut(direction).discharge(slots, now));
        }
        Ok(departed)
    }

    /// Run one full tick of length `dt`: arrivals, departures, clock.
    pub fn step(&mut self, dt: f64) -> Result<StepReport, QueueError> {
        let time = self.now;
        let arrivals = self.generate_arrivals(dt)?;
        let departed = self.process_departures(dt)?;
        self.now += dt;
        Ok(StepReport {
            time,
            dt,
            arrivals,
            departed,
        })
    }

    /// Run one tick of the configured length.
    pub fn tick(&mut self) -> Result<StepReport, QueueError> {
        self.step(self.config.time_step)
    }

    // -----------------------------------------------------------------------
    // Projections
    // -----------------------------------------------------------------------

    /// Controller-facing observations for all approaches.
    pub fn traffic_state(&self) -> TrafficState {
        let now = self.now;
        self.approaches.map(|_, approach| approach.observation(now))
    }

    /// Queue length per approach.
    pub fn queue_lengths(&self) -> PerDirection<usize> {
        self.approaches.map(|_, approach| approach.queue_len())
    }

    /// Vehicles queued across the intersection.
    pub fn total_queue(&self) -> usize {
        self.approaches
            .iter()
            .fold(0_usize, |acc, (_, approach)| acc.saturating_add(approach.queue_len()))
    }

    /// Totals and per-approach breakdown.
    pub fn statistics(&self) -> SimulatorStatistics {
        let by_direction = self.approaches.map(|_, approach| approach.statistics());
        let mut total_arrivals: u64 = 0;
        let mut total_departures: u64 = 0;
        let mut total_waiting = 0.0;
        for (_, stats) in by_direction.iter() {
            total_arrivals = total_arrivals.saturating_add(stats.arrivals);
            total_departures = total_departures.saturating_add(stats.departures);
            total_waiting += stats.total_waiting_time;
        }
        let average_waiting_time = if total_departures == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let departed = total_departures as f64;
            total_waiting / departed
        };
        let total_queue = self.total_queue();
        SimulatorStatistics {
            simulation_time: self.now,
            total_arrivals,
            total_departures,
            vehicles_in_system: total_queue,
            total_queue_length: total_queue,
            average_waiting_time,
            by_direction,
        }
    }

    /// Return to time zero: empty queues, red lights, no events, and the
    /// arrival sequence restarted from the seed. Arrival rates are kept.
    pub fn reset(&mut self) {
        for direction in Direction::ALL {
            self.approaches.get_mut(direction).clear();
        }
        self.sampler.reseed();
        self.now = 0.0;
        self.next_id = 0;
        self.events.clear();
    }
}

fn validate_step(dt: f64) -> Result<(), QueueError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(QueueError::InvalidTimeStep { value: dt })
    }
}

fn validate_rate(direction: Direction, rate: f64) -> Result<(), QueueError> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(())
    } else {
        Err(QueueError::InvalidArrivalRate { direction, rate })
    }
}

/// `floor(dt / interval)`, saturating into `usize`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn departure_slots(dt: f64, interval: f64) -> usize {
    let slots = (dt / interval).floor();
    if slots <= 0.0 {
        0
    } else if slots >= f64::from(u32::MAX) {
        u32::MAX as usize
    } else {
        slots as usize
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sim(rates: PerDirection<f64>) -> QueueSimulator {
        QueueSimulator::new(rates, QueueConfig::default()).unwrap()
    }

    #[test]
    fn departure_slots_floor() {
        assert_eq!(departure_slots(1.0, 0.5), 2);
        assert_eq!(departure_slots(1.2, 0.5), 2);
        assert_eq!(departure_slots(0.4, 0.5), 0);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let rates = PerDirection::splat(10.0);
        let bad_step = QueueConfig {
            time_step: 0.0,
            ..QueueConfig::default()
        };
        assert!(matches!(
            QueueSimulator::new(rates, bad_step),
            Err(QueueError::InvalidTimeStep { .. })
        ));
        let bad_interval = QueueConfig {
            departure_interval: -1.0,
            ..QueueConfig::default()
        };
        assert!(matches!(
            QueueSimulator::new(rates, bad_interval),
            Err(QueueError::InvalidDepartureInterval { .. })
        ));
        let mut negative = rates;
        negative.east = -2.0;
        assert!(matches!(
            QueueSimulator::new(negative, QueueConfig::default()),
            Err(QueueError::InvalidArrivalRate { direction: Direction::East, .. })
        ));
        let mut s = sim(rates);
        assert!(s.step(f64::NAN).is_err());
        assert!((s.now() - 0.0).abs() < 1e-12);
    }

    #[test]
    fn zero_rates_never_generate_arrivals() {
        let mut s = sim(PerDirection::splat(0.0));
        for _ in 0..500 {
            let report = s.tick().unwrap();
            assert_eq!(report.arrivals, PerDirection::splat(0));
        }
        assert_eq!(s.statistics().total_arrivals, 0);
        assert!((s.now() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn red_lights_hold_every_vehicle() {
        let mut s = sim(PerDirection::splat(30.0));
        for _ in 0..300 {
            let report = s.tick().unwrap();
            assert!(report.departed.is_empty());
        }
        let stats = s.statistics();
        assert_eq!(stats.total_departures, 0);
        assert_eq!(stats.vehicles_in_system as u64, stats.total_arrivals);
    }

    #[test]
    fn unknown_direction_name_changes_nothing() {
        let mut s = sim(PerDirection::splat(0.0));
        let err = s.set_light_state_by_name("up", LightState::Green).unwrap_err();
        assert!(matches!(err, QueueError::Direction(_)));
        assert!(s.event_log().is_empty());
        s.set_light_state_by_name("north", LightState::Green).unwrap();
        assert_eq!(s.light_state(Direction::North), LightState::Green);
    }

    #[test]
    fn only_actual_changes_are_logged() {
        let mut s = sim(PerDirection::splat(0.0));
        s.set_all_lights(&PerDirection::new(
            LightState::Green,
            LightState::Green,
            LightState::Red,
            LightState::Red,
        ));
        assert_eq!(s.event_log().len(), 2);
        s.step(5.0).unwrap();
        s.set_light_state(Direction::North, LightState::Green);
        s.set_light_state(Direction::North, LightState::Yellow);
        let last = s.event_log().last().copied().unwrap();
        assert_eq!(s.event_log().len(), 3);
        assert_eq!(last.direction, Direction::North);
        assert_eq!(last.from, LightState::Green);
        assert_eq!(last.to, LightState::Yellow);
        assert!((last.time - 5.0).abs() < 1e-12);
    }

    #[test]
    fn reset_restores_initial_state_and_sequence() {
        let mut s = sim(PerDirection::splat(20.0));
        s.set_light_state(Direction::East, LightState::Green);
        let first: Vec<_> = (0..50).map(|_| s.tick().unwrap().arrivals).collect();
        s.reset();
        assert!((s.now() - 0.0).abs() < 1e-12);
        assert_eq!(s.total_queue(), 0);
        assert!(s.event_log().is_empty());
        assert_eq!(s.light_state(Direction::East), LightState::Red);
        s.set_light_state(Direction::East, LightState::Green);
        let again: Vec<_> = (0..50).map(|_| s.tick().unwrap().arrivals).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn statistics_serialize_with_breakdown() {
        let mut s = sim(PerDirection::new(30.0, 0.0, 0.0, 0.0));
        s.set_light_state(Direction::North, LightState::Green);
        for _ in 0..120 {
            s.tick().unwrap();
        }
        let stats = s.statistics();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["by_direction"]["south"]["arrivals"], 0);
        assert_eq!(json["by_direction"]["north"]["light"], "green");
        assert_eq!(
            stats.total_arrivals,
            stats.total_departures + stats.vehicles_in_system as u64
        );
    }
}
