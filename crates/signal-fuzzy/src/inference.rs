//! Mamdani inference: fuzzify, fire rules, aggregate, defuzzify.
//!
//! One [`InferenceEngine`] holds the three variables and a bound
//! [`RuleBase`] per direction. Inference for one direction reads the whole
//! [`TrafficState`] (rules look at the opposite and perpendicular approaches)
//! and never mutates anything, so a failure for one direction cannot affect
//! another.

use signal_types::{Direction, PerDirection, TrafficState};
use tracing::debug;

use crate::defuzzify;
use crate::error::FuzzyError;
use crate::rules::{InputTerm, Lookup, RuleBase, RuleTemplate, standard_template};
use crate::terms::{
    DensityTerm, GreenTerm, WaitingTerm, density_variable, green_variable, waiting_variable,
};
use crate::variable::{FuzzyVariable, Grades};

/// Firing strength of one bound rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFiring {
    /// Rule label, `R<n>_<direction>_<suffix>`.
    pub label: String,
    /// Antecedent strength in `[0, 1]`.
    pub strength: f64,
    /// The output region the rule drives.
    pub consequent: GreenTerm,
}

/// Full trace of one inference.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    /// Direction decided.
    pub direction: Direction,
    /// Every rule of the direction with its strength, in rule order.
    pub firing: Vec<RuleFiring>,
    /// Per-region activation (max strength of rules with that consequent).
    pub activations: Grades<GreenTerm>,
    /// Centroid of the aggregated output, or `None` when nothing fired.
    pub green_time: Option<f64>,
}

impl Inference {
    /// Rules with non-zero strength.
    pub fn fired(&self) -> impl Iterator<Item = &RuleFiring> {
        self.firing.iter().filter(|f| f.strength > 0.0)
    }
}

/// Grades of every input variable for all four approaches.
struct Fuzzified {
    density: PerDirection<Grades<DensityTerm>>,
    waiting: PerDirection<Grades<WaitingTerm>>,
}

impl Fuzzified {
    fn grade(&self, lookup: &Lookup<Direction>) -> f64 {
        match lookup.term {
            InputTerm::Density(term) => self.density.get(lookup.at).get(term),
            InputTerm::Waiting(term) => self.waiting.get(lookup.at).get(term),
        }
    }
}

/// A Mamdani fuzzy inference engine producing green durations.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    density: FuzzyVariable<DensityTerm>,
    waiting: FuzzyVariable<WaitingTerm>,
    green: FuzzyVariable<GreenTerm>,
    rule_bases: PerDirection<RuleBase>,
}

impl InferenceEngine {
    /// Standard variables and the standard 28-rule template.
    pub fn standard() -> Self {
        Self::with_template(&standard_template())
    }

    /// Standard variables with a custom rule template.
    pub fn with_template(template: &[RuleTemplate]) -> Self {
        Self::new(density_variable(), waiting_variable(), green_variable(), template)
    }

    /// Fully custom variables and template.
    pub fn new(
        density: FuzzyVariable<DensityTerm>,
        waiting: FuzzyVariable<WaitingTerm>,
        green: FuzzyVariable<GreenTerm>,
        template: &[RuleTemplate],
    ) -> Self {
        Self {
            density,
            waiting,
            green,
            rule_bases: PerDirection::from_fn(|d| RuleBase::for_direction(template, d)),
        }
    }

    /// The density input variable.
    pub const fn density(&self) -> &FuzzyVariable<DensityTerm> {
        &self.density
    }

    /// The waiting-time input variable.
    pub const fn waiting(&self) -> &FuzzyVariable<WaitingTerm> {
        &self.waiting
    }

    /// The green-time output variable.
    pub const fn green(&self) -> &FuzzyVariable<GreenTerm> {
        &self.green
    }

    /// The bound rules for `direction`.
    pub const fn rule_base(&self, direction: Direction) -> &RuleBase {
        self.rule_bases.get(direction)
    }

    /// Green duration for `direction` under `state`.
    ///
    /// Inputs are clamped into their universes first. Fails with
    /// [`FuzzyError::DegenerateOutput`] when no rule fires.
    pub fn infer(&self, direction: Direction, state: &TrafficState) -> Result<f64, FuzzyError> {
        let inference = self.explain(direction, state);
        let green_time = inference
            .green_time
            .ok_or(FuzzyError::DegenerateOutput { direction })?;
        debug!(
            direction = %direction,
            green_time,
            fired = inference.fired().count(),
            "fuzzy inference"
        );
        Ok(green_time)
    }

    /// Run inference and keep the intermediate results.
    pub fn explain(&self, direction: Direction, state: &TrafficState) -> Inference {
        let fuzzified = self.fuzzify(state);
        let mut activations = Grades::zero();
        let firing: Vec<RuleFiring> = self
            .rule_base(direction)
            .rules()
            .iter()
            .map(|rule| {
                let strength = rule
                    .antecedent
                    .strength(&|lookup: &Lookup<Direction>| fuzzified.grade(lookup));
                activations.raise(rule.consequent, strength);
                RuleFiring {
                    label: rule.label.clone(),
                    strength,
                    consequent: rule.consequent,
                }
            })
            .collect();
        let green_time = self.defuzzify(&activations);
        Inference {
            direction,
            firing,
            activations,
            green_time,
        }
    }

    /// Centroid of the output regions clipped at `activations`.
    pub fn defuzzify(&self, activations: &Grades<GreenTerm>) -> Option<f64> {
        defuzzify::defuzzify(&self.green, activations)
    }

    fn fuzzify(&self, state: &TrafficState) -> Fuzzified {
        Fuzzified {
            density: state.map(|_, obs| self.density.fuzzify(obs.density)),
            waiting: state.map(|_, obs| self.waiting.fuzzify(obs.waiting_time)),
        }
    }
}

impl Default for InferenceEngine {
    fn default() -> Self {
        Self::standard()
    }
}
