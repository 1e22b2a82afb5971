//! The Mamdani rule base.
//!
//! Every direction owns the same 28 rules, written once as a template over
//! four roles relative to the direction being decided:
//!
//! - [`Role::Current`] -- the direction itself
//! - [`Role::Opposite`] -- the other direction on its axis
//! - [`Role::FirstPerpendicular`] / [`Role::SecondPerpendicular`] -- the two
//!   directions on the crossing axis, in canonical order
//!
//! [`RuleBase::for_direction`] binds the template through the fixed
//! intersection topology. Rule labels take the form
//! `R<n>_<direction>_<suffix>`, so the four rule sets never share a label.
//!
//! # Rule groups
//!
//! - Density priority (1-12): green follows own density against the
//!   opposite approach, with a floor for high density and a starvation guard.
//! - Waiting priority (13-20): long waits extend green, shared long waits
//!   are balanced.
//! - Fairness and balance (21-28): whole-intersection patterns.

use serde::{Deserialize, Serialize};
use signal_types::Direction;

use crate::terms::{DensityTerm, GreenTerm, WaitingTerm};

// ---------------------------------------------------------------------------
// Roles and lookups
// ---------------------------------------------------------------------------

/// Position of an approach relative to the direction being decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The direction being decided.
    Current,
    /// The other direction on the same axis.
    Opposite,
    /// First direction on the crossing axis.
    FirstPerpendicular,
    /// Second direction on the crossing axis.
    SecondPerpendicular,
}

impl Role {
    /// The concrete direction this role names when deciding `direction`.
    pub const fn resolve(self, direction: Direction) -> Direction {
        let [first, second] = direction.perpendicular();
        match self {
            Self::Current => direction,
            Self::Opposite => direction.opposite(),
            Self::FirstPerpendicular => first,
            Self::SecondPerpendicular => second,
        }
    }
}

/// A region of one of the two input variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputTerm {
    /// A density region.
    Density(DensityTerm),
    /// A waiting-time region.
    Waiting(WaitingTerm),
}

/// "The input at `at` is in region `term`".
///
/// `A` is [`Role`] inside a template and [`Direction`] once bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lookup<A> {
    /// Which approach is read.
    pub at: A,
    /// Which variable and region.
    pub term: InputTerm,
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// A boolean antecedent tree. AND is min, OR is max.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition<L> {
    /// A single membership lookup.
    Is(L),
    /// Conjunction of all children.
    All(Vec<Condition<L>>),
    /// Disjunction of any child.
    Any(Vec<Condition<L>>),
}

impl<L> Condition<L> {
    /// Firing strength under `grade`, which evaluates one lookup.
    ///
    /// An empty `All` is fully true and an empty `Any` fully false.
    pub fn strength(&self, grade: &impl Fn(&L) -> f64) -> f64 {
        match self {
            Self::Is(lookup) => grade(lookup),
            Self::All(children) => children
                .iter()
                .map(|child| child.strength(grade))
                .fold(1.0, f64::min),
            Self::Any(children) => children
                .iter()
                .map(|child| child.strength(grade))
                .fold(0.0, f64::max),
        }
    }

    /// Rewrite every lookup with `f`, keeping the tree shape.
    pub fn map<M>(&self, f: &impl Fn(&L) -> M) -> Condition<M> {
        match self {
            Self::Is(lookup) => Condition::Is(f(lookup)),
            Self::All(children) => Condition::All(children.iter().map(|c| c.map(f)).collect()),
            Self::Any(children) => Condition::Any(children.iter().map(|c| c.map(f)).collect()),
        }
    }

    /// Visit every lookup in the tree.
    pub fn lookups(&self) -> Vec<&L> {
        let mut out = Vec::new();
        self.collect_lookups(&mut out);
        out
    }

    fn collect_lookups<'a>(&'a self, out: &mut Vec<&'a L>) {
        match self {
            Self::Is(lookup) => out.push(lookup),
            Self::All(children) | Self::Any(children) => {
                for child in children {
                    child.collect_lookups(out);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Templates and bound rules
// ---------------------------------------------------------------------------

/// Which group a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Rules 1-12.
    DensityPriority,
    /// Rules 13-20.
    WaitingPriority,
    /// Rules 21-28.
    FairnessBalance,
}

/// A rule written over roles, not yet bound to a direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTemplate {
    /// Rule number within the template.
    pub number: u8,
    /// Label suffix, e.g. `high_opp_low`.
    pub suffix: String,
    /// Rule group.
    pub category: RuleCategory,
    /// Antecedent over roles.
    pub antecedent: Condition<Lookup<Role>>,
    /// Output region.
    pub consequent: GreenTerm,
}

/// A rule bound to a concrete direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique label, `R<n>_<direction>_<suffix>`.
    pub label: String,
    /// The direction whose green this rule decides.
    pub direction: Direction,
    /// Rule group.
    pub category: RuleCategory,
    /// Antecedent over concrete directions.
    pub antecedent: Condition<Lookup<Direction>>,
    /// Output region.
    pub consequent: GreenTerm,
}

impl RuleTemplate {
    /// Bind the template to `direction`.
    pub fn bind(&self, direction: Direction) -> Rule {
        Rule {
            label: format!("R{}_{}_{}", self.number, direction, self.suffix),
            direction,
            category: self.category,
            antecedent: self.antecedent.map(&|lookup: &Lookup<Role>| Lookup {
                at: lookup.at.resolve(direction),
                term: lookup.term,
            }),
            consequent: self.consequent,
        }
    }
}

/// All rules for one direction.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBase {
    direction: Direction,
    rules: Vec<Rule>,
}

impl RuleBase {
    /// Bind every template rule to `direction`.
    pub fn for_direction(template: &[RuleTemplate], direction: Direction) -> Self {
        Self {
            direction,
            rules: template.iter().map(|t| t.bind(direction)).collect(),
        }
    }

    /// The direction this rule base decides.
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// The bound rules, in template order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

// ---------------------------------------------------------------------------
// Standard template
// ---------------------------------------------------------------------------

fn dens(at: Role, term: DensityTerm) -> Condition<Lookup<Role>> {
    Condition::Is(Lookup {
        at,
        term: InputTerm::Density(term),
    })
}

fn wait(at: Role, term: WaitingTerm) -> Condition<Lookup<Role>> {
    Condition::Is(Lookup {
        at,
        term: InputTerm::Waiting(term),
    })
}

fn rule(
    number: u8,
    suffix: &str,
    category: RuleCategory,
    antecedent: Condition<Lookup<Role>>,
    consequent: GreenTerm,
) -> RuleTemplate {
    RuleTemplate {
        number,
        suffix: suffix.to_owned(),
        category,
        antecedent,
        consequent,
    }
}

/// The standard 28-rule template.
#[allow(clippy::too_many_lines)]
pub fn standard_template() -> Vec<RuleTemplate> {
    use Condition::{All, Any};
    use DensityTerm::{High, Low, Medium as Med};
    use GreenTerm::{Long as GLong, Medium as GMed, Short as GShort, VeryLong as GVeryLong};
    use Role::{
        Current as C, FirstPerpendicular as P1, Opposite as O, SecondPerpendicular as P2,
    };
    use RuleCategory::{DensityPriority as D, FairnessBalance as F, WaitingPriority as W};
    use WaitingTerm::{Long as WLong, Medium as WMed, Short as WShort, VeryLong as WVeryLong};

    vec![
        // Density priority
        rule(1, "high_opp_low", D, All(vec![dens(C, High), dens(O, Low)]), GVeryLong),
        rule(2, "high_opp_med", D, All(vec![dens(C, High), dens(O, Med)]), GLong),
        rule(3, "high_opp_high", D, All(vec![dens(C, High), dens(O, High)]), GMed),
        rule(4, "med_opp_low", D, All(vec![dens(C, Med), dens(O, Low)]), GLong),
        rule(5, "med_opp_med", D, All(vec![dens(C, Med), dens(O, Med)]), GMed),
        rule(6, "med_opp_high", D, All(vec![dens(C, Med), dens(O, High)]), GShort),
        rule(7, "low_opp_low", D, All(vec![dens(C, Low), dens(O, Low)]), GShort),
        rule(8, "low_opp_med", D, All(vec![dens(C, Low), dens(O, Med)]), GShort),
        rule(9, "low_opp_high", D, All(vec![dens(C, Low), dens(O, High)]), GShort),
        rule(10, "high_minimum", D, dens(C, High), GMed),
        rule(
            11,
            "fairness_perp",
            D,
            All(vec![
                dens(C, Med),
                dens(O, Low),
                Any(vec![dens(P1, High), dens(P2, High)]),
            ]),
            GMed,
        ),
        rule(
            12,
            "starvation_prevent",
            D,
            All(vec![dens(C, Low), wait(C, WVeryLong)]),
            GMed,
        ),
        // Waiting priority
        rule(13, "very_long_wait", W, wait(C, WVeryLong), GLong),
        rule(
            14,
            "long_wait_high_dens",
            W,
            All(vec![wait(C, WLong), dens(C, High)]),
            GVeryLong,
        ),
        rule(
            15,
            "long_wait_med_dens",
            W,
            All(vec![wait(C, WLong), dens(C, Med)]),
            GLong,
        ),
        rule(
            16,
            "med_wait_low_dens",
            W,
            All(vec![wait(C, WMed), dens(C, Low)]),
            GMed,
        ),
        rule(
            17,
            "short_wait_high_dens",
            W,
            All(vec![wait(C, WShort), dens(C, High)]),
            GLong,
        ),
        rule(
            18,
            "both_very_long_wait",
            W,
            All(vec![wait(C, WVeryLong), wait(O, WVeryLong)]),
            GMed,
        ),
        rule(
            19,
            "perp_very_long_wait",
            W,
            All(vec![
                wait(C, WLong),
                Any(vec![wait(P1, WVeryLong), wait(P2, WVeryLong)]),
            ]),
            GMed,
        ),
        rule(
            20,
            "only_waiting",
            W,
            All(vec![
                wait(C, WMed),
                wait(O, WShort),
                wait(P1, WShort),
                wait(P2, WShort),
            ]),
            GLong,
        ),
        // Fairness and balance
        rule(
            21,
            "all_high_dens",
            F,
            All(vec![dens(C, High), dens(O, High), dens(P1, High), dens(P2, High)]),
            GMed,
        ),
        rule(
            22,
            "only_high_dens",
            F,
            All(vec![dens(C, High), dens(O, Low), dens(P1, Low), dens(P2, Low)]),
            GVeryLong,
        ),
        rule(
            23,
            "give_way",
            F,
            All(vec![dens(C, Med), dens(O, High), dens(P1, High), dens(P2, High)]),
            GShort,
        ),
        rule(
            24,
            "balanced",
            F,
            All(vec![dens(C, Med), dens(O, Med), dens(P1, Med), dens(P2, Med)]),
            GMed,
        ),
        rule(
            25,
            "prevent_blocking",
            F,
            All(vec![dens(C, High), Any(vec![dens(P1, High), dens(P2, High)])]),
            GMed,
        ),
        rule(
            26,
            "quick_switch",
            F,
            All(vec![dens(C, Low), Any(vec![wait(P1, WLong), wait(P2, WLong)])]),
            GShort,
        ),
        rule(
            27,
            "opportunistic",
            F,
            All(vec![dens(C, Med), dens(O, Low), dens(P1, Med), dens(P2, Med)]),
            GLong,
        ),
        rule(
            28,
            "wait_vs_density_balance",
            F,
            All(vec![wait(C, WLong), dens(C, Low), dens(O, High)]),
            GMed,
        ),
    ]
}
