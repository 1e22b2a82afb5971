//! Vehicles waiting in, and departed from, an approach queue.
//!
//! A [`Vehicle`] becomes a [`DepartedVehicle`] by value through
//! [`Vehicle::depart`], so a vehicle can leave the intersection at most once
//! and its waiting time only exists after it has left.

use std::fmt;

use serde::{Deserialize, Serialize};
use signal_types::Direction;

/// Sequential vehicle identifier, unique within one simulator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VehicleId(pub u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "veh-{}", self.0)
    }
}

/// A vehicle waiting at an approach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Identifier.
    pub id: VehicleId,
    /// Approach the vehicle arrived on.
    pub direction: Direction,
    /// Simulation time of arrival in seconds.
    pub arrival_time: f64,
}

impl Vehicle {
    /// Time spent waiting so far at `now`.
    pub fn waited(&self, now: f64) -> f64 {
        (now - self.arrival_time).max(0.0)
    }

    /// Let the vehicle through at `now`.
    pub const fn depart(self, now: f64) -> DepartedVehicle {
        DepartedVehicle {
            id: self.id,
            direction: self.direction,
            arrival_time: self.arrival_time,
            departure_time: now,
        }
    }
}

/// A vehicle that has crossed the stop line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepartedVehicle {
    /// Identifier.
    pub id: VehicleId,
    /// Approach the vehicle arrived on.
    pub direction: Direction,
    /// Simulation time of arrival in seconds.
    pub arrival_time: f64,
    /// Simulation time of departure in seconds.
    pub departure_time: f64,
}

impl DepartedVehicle {
    /// Departure time minus arrival time.
    pub fn waiting_time(&self) -> f64 {
        self.departure_time - self.arrival_time
    }
}
