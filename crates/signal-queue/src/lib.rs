//! Discrete-time queueing simulator for a four-way signalised intersection.
//!
//! Vehicles arrive on each approach as a seeded Poisson process, wait in a
//! FIFO queue, and depart at a fixed saturation headway while their light is
//! green. Controllers drive the lights from outside; the simulator only
//! projects each approach into a density/waiting-time [`Observation`] for
//! them.
//!
//! # Modules
//!
//! - [`vehicle`] -- [`Vehicle`] and [`DepartedVehicle`].
//! - [`approach`] -- Per-direction queue, light and totals.
//! - [`arrivals`] -- Seeded Poisson sampling.
//! - [`simulator`] -- [`QueueSimulator`] and its tick.
//! - [`error`] -- [`QueueError`].
//!
//! [`Observation`]: signal_types::Observation

pub mod approach;
pub mod arrivals;
pub mod error;
pub mod simulator;
pub mod vehicle;

pub use approach::{Approach, ApproachStatistics, DENSITY_MAX, DENSITY_PER_VEHICLE, WAITING_CAP};
pub use arrivals::ArrivalSampler;
pub use error::QueueError;
pub use simulator::{QueueConfig, QueueSimulator, SimulatorStatistics, StepReport};
pub use vehicle::{DepartedVehicle, Vehicle, VehicleId};
