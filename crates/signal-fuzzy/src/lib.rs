//! Mamdani fuzzy inference for per-direction green durations.
//!
//! Density and head-of-queue waiting time for all four approaches go in,
//! a green duration in seconds for one direction comes out. Inference is
//! pure: the same [`TrafficState`](signal_types::TrafficState) always yields
//! the same duration.
//!
//! # Modules
//!
//! - [`membership`] -- Triangular membership functions.
//! - [`variable`] -- [`Universe`], the [`Term`] trait, [`FuzzyVariable`] and
//!   [`Grades`].
//! - [`terms`] -- Density, waiting-time and green-time regions with their
//!   standard shapes.
//! - [`rules`] -- Role-based rule template, the standard 28 rules, and
//!   per-direction binding.
//! - [`defuzzify`] -- Max aggregation and centroid.
//! - [`inference`] -- [`InferenceEngine`] tying it together.
//! - [`error`] -- [`FuzzyError`].

pub mod defuzzify;
pub mod error;
pub mod inference;
pub mod membership;
pub mod rules;
pub mod terms;
pub mod variable;

pub use error::FuzzyError;
pub use inference::{Inference, InferenceEngine, RuleFiring};
pub use membership::Triangle;
pub use rules::{Condition, InputTerm, Lookup, Role, Rule, RuleBase, RuleCategory, RuleTemplate};
pub use terms::{DensityTerm, GreenTerm, WaitingTerm};
pub use variable::{FuzzyVariable, Grades, Term, Universe};
