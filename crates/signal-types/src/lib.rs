//! Shared type definitions for the intersection signal-control workspace.
//!
//! This crate is the single source of truth for the types that cross crate
//! boundaries: the fuzzy engine reads [`TrafficState`], the queue simulator
//! produces it, controllers emit [`LightState`] assignments and
//! [`ScheduledPhase`] rows, and reporting consumes all of them.
//!
//! # Modules
//!
//! - [`direction`] -- [`Direction`], [`Axis`] and the [`PerDirection`]
//!   container with the fixed opposite/perpendicular topology.
//! - [`enums`] -- [`LightState`] and the six-phase [`PhaseKind`] cycle.
//! - [`structs`] -- Observations, schedule rows, bridge decisions and
//!   light-change records.
//! - [`error`] -- [`TypesError`] for rejected external input.

pub mod direction;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use direction::{Axis, Direction, PerDirection};
pub use enums::{LightState, PhaseKind};
pub use error::TypesError;
pub use structs::{GreenDecision, LightChange, Observation, ScheduledPhase, TrafficState};
