//! Signal controllers, metrics and comparison runs for the intersection.
//!
//! This crate owns the six-phase signal cycle and the two policies that
//! drive it: a fixed-time baseline and the fuzzy adaptive controller. It
//! also runs scenarios through the queue simulator and compares the two.
//!
//! # Modules
//!
//! - [`phase`] -- [`Phase`], cycle timing and schedules.
//! - [`controller`] -- The [`SignalController`] trait.
//! - [`fixed`] -- [`FixedTimeController`].
//! - [`fuzzy`] -- [`FuzzyController`] with fallback on degenerate inference.
//! - [`metrics`] -- [`PerformanceMetrics`], summaries and comparisons.
//! - [`config`] -- Configuration loading from `signal-config.yaml` into
//!   strongly-typed structs.
//! - [`scenario`] -- Built-in and custom traffic scenarios.
//! - [`environment`] -- [`TrafficEnvironment`] bridge and the driver loop.
//! - [`runner`] -- Scenario runs and fuzzy-versus-fixed comparisons.
//!
//! [`Phase`]: phase::Phase
//! [`SignalController`]: controller::SignalController
//! [`FixedTimeController`]: fixed::FixedTimeController
//! [`FuzzyController`]: fuzzy::FuzzyController
//! [`PerformanceMetrics`]: metrics::PerformanceMetrics
//! [`TrafficEnvironment`]: environment::TrafficEnvironment

pub mod config;
pub mod controller;
pub mod environment;
pub mod fixed;
pub mod fuzzy;
pub mod metrics;
pub mod phase;
pub mod runner;
pub mod scenario;
