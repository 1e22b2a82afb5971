//! Fuzzy variables: a bounded universe plus a closed set of named regions.
//!
//! Region names are closed enums implementing [`Term`], so a variable holds
//! exactly one [`Triangle`] per term and lookups go by index instead of by
//! string.

use std::fmt;
use std::marker::PhantomData;

use crate::error::FuzzyError;
use crate::membership::Triangle;

// ---------------------------------------------------------------------------
// Universe
// ---------------------------------------------------------------------------

/// The closed range a variable is defined over, with its sampling step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Universe {
    min: f64,
    max: f64,
    resolution: f64,
}

impl Universe {
    /// Create a universe `[min, max]` sampled every `resolution`.
    pub fn new(min: f64, max: f64, resolution: f64) -> Result<Self, FuzzyError> {
        let valid = min.is_finite()
            && max.is_finite()
            && resolution.is_finite()
            && max > min
            && resolution > 0.0;
        if !valid {
            return Err(FuzzyError::InvalidUniverse {
                min,
                max,
                resolution,
            });
        }
        Ok(Self {
            min,
            max,
            resolution,
        })
    }

    /// Build a universe from constants already known to be valid.
    pub(crate) const fn from_constants(min: f64, max: f64, resolution: f64) -> Self {
        Self {
            min,
            max,
            resolution,
        }
    }

    /// Lower bound.
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Sampling step.
    pub const fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Clamp `x` into the universe. NaN maps to the lower bound.
    pub fn clamp(&self, x: f64) -> f64 {
        if x.is_nan() {
            self.min
        } else {
            x.clamp(self.min, self.max)
        }
    }

    /// Sample points `min, min + step, ...` up to and including `max`
    /// (within a small tolerance for accumulated rounding).
    pub fn samples(&self) -> Vec<f64> {
        let tolerance = self.resolution * 1e-9;
        let mut points = Vec::new();
        let mut step: u32 = 0;
        loop {
            let x = self.resolution.mul_add(f64::from(step), self.min);
            if x > self.max + tolerance {
                break;
            }
            points.push(x.min(self.max));
            step = match step.checked_add(1) {
                Some(next) => next,
                None => break,
            };
        }
        points
    }
}

// ---------------------------------------------------------------------------
// Terms
// ---------------------------------------------------------------------------

/// A closed set of region names for one kind of variable.
pub trait Term: Copy + Eq + fmt::Debug + 'static {
    /// Every term, in index order.
    const ALL: &'static [Self];

    /// Lowercase region name.
    fn name(self) -> &'static str;

    /// Position of this term within [`Term::ALL`].
    fn index(self) -> usize;
}

/// One membership grade per term of `T`.
#[derive(Clone, PartialEq)]
pub struct Grades<T: Term> {
    values: Vec<f64>,
    _terms: PhantomData<T>,
}

impl<T: Term> Grades<T> {
    /// All grades zero.
    pub fn zero() -> Self {
        Self::from_fn(|_| 0.0)
    }

    /// Build by calling `f` once per term.
    pub fn from_fn(mut f: impl FnMut(T) -> f64) -> Self {
        Self {
            values: T::ALL.iter().map(|&term| f(term)).collect(),
            _terms: PhantomData,
        }
    }

    /// Grade for `term`.
    pub fn get(&self, term: T) -> f64 {
        self.values.get(term.index()).copied().unwrap_or(0.0)
    }

    /// Raise the grade for `term` to at least `value` (fuzzy OR).
    pub fn raise(&mut self, term: T, value: f64) {
        if let Some(slot) = self.values.get_mut(term.index()) {
            *slot = slot.max(value);
        }
    }

    /// `(term, grade)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (T, f64)> + '_ {
        T::ALL.iter().map(move |&term| (term, self.get(term)))
    }

    /// Whether every grade is zero.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|&v| v <= 0.0)
    }
}

impl<T: Term> fmt::Debug for Grades<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(term, grade)| (term.name(), grade)))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Variable
// ---------------------------------------------------------------------------

/// A named fuzzy variable with one triangular region per term.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyVariable<T: Term> {
    name: String,
    universe: Universe,
    regions: Vec<Triangle>,
    _terms: PhantomData<T>,
}

impl<T: Term> FuzzyVariable<T> {
    /// Define a variable. `shape` supplies the triangle for every term;
    /// each must be finite and ordered.
    pub fn new(
        name: impl Into<String>,
        universe: Universe,
        shape: impl Fn(T) -> Triangle,
    ) -> Result<Self, FuzzyError> {
        let name = name.into();
        let mut regions = Vec::with_capacity(T::ALL.len());
        for &term in T::ALL {
            let region = shape(term);
            if !region.is_valid() {
                return Err(FuzzyError::InvalidRegion {
                    variable: name,
                    region: term.name(),
                    a: region.a,
                    b: region.b,
                    c: region.c,
                });
            }
            regions.push(region);
        }
        Ok(Self {
            name,
            universe,
            regions,
            _terms: PhantomData,
        })
    }

    /// Build a variable from constant shapes already known to be valid.
    pub(crate) fn from_constants(
        name: &str,
        universe: Universe,
        shape: impl Fn(T) -> Triangle,
    ) -> Self {
        Self {
            name: name.to_owned(),
            universe,
            regions: T::ALL.iter().map(|&term| shape(term)).collect(),
            _terms: PhantomData,
        }
    }

    /// Variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The universe the variable is defined over.
    pub const fn universe(&self) -> &Universe {
        &self.universe
    }

    /// The triangle for `term`.
    pub fn region(&self, term: T) -> Option<&Triangle> {
        self.regions.get(term.index())
    }

    /// Membership of `value` in `term`, after clamping into the universe.
    pub fn membership(&self, term: T, value: f64) -> f64 {
        let x = self.universe.clamp(value);
        self.region(term).map_or(0.0, |region| region.grade(x))
    }

    /// Grades of `value` in every term.
    pub fn fuzzify(&self, value: f64) -> Grades<T> {
        let x = self.universe.clamp(value);
        Grades::from_fn(|term| self.region(term).map_or(0.0, |region| region.grade(x)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::terms::DensityTerm;

    fn density() -> FuzzyVariable<DensityTerm> {
        FuzzyVariable::new("density", Universe::new(0.0, 100.0, 1.0).unwrap(), |t| match t {
            DensityTerm::Low => Triangle::new(0.0, 0.0, 50.0),
            DensityTerm::Medium => Triangle::new(20.0, 50.0, 80.0),
            DensityTerm::High => Triangle::new(50.0, 100.0, 100.0),
        })
        .unwrap()
    }

    #[test]
    fn universe_samples_include_both_ends() {
        let u = Universe::new(10.0, 90.0, 1.0).unwrap();
        let samples = u.samples();
        assert_eq!(samples.len(), 81);
        assert!((samples.first().copied().unwrap() - 10.0).abs() < 1e-12);
        assert!((samples.last().copied().unwrap() - 90.0).abs() < 1e-12);
    }

    #[test]
    fn universe_rejects_bad_ranges() {
        assert!(Universe::new(10.0, 10.0, 1.0).is_err());
        assert!(Universe::new(0.0, 10.0, 0.0).is_err());
        assert!(Universe::new(0.0, f64::NAN, 1.0).is_err());
    }

    #[test]
    fn values_are_clamped_before_evaluation() {
        let v = density();
        assert!((v.membership(DensityTerm::High, 250.0) - 1.0).abs() < 1e-12);
        assert!((v.membership(DensityTerm::Low, -30.0) - 1.0).abs() < 1e-12);
        assert!((v.membership(DensityTerm::Low, f64::NAN) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fuzzify_returns_a_grade_per_term() {
        let grades = density().fuzzify(65.0);
        assert!((grades.get(DensityTerm::Low) - 0.0).abs() < 1e-12);
        assert!((grades.get(DensityTerm::Medium) - 0.5).abs() < 1e-12);
        assert!((grades.get(DensityTerm::High) - 0.3).abs() < 1e-12);
        assert_eq!(grades.iter().count(), 3);
    }

    #[test]
    fn invalid_region_is_rejected() {
        let err = FuzzyVariable::new("density", Universe::new(0.0, 100.0, 1.0).unwrap(), |t| {
            match t {
                DensityTerm::Medium => Triangle::new(80.0, 50.0, 20.0),
                _ => Triangle::new(0.0, 0.0, 50.0),
            }
        })
        .unwrap_err();
        assert!(matches!(err, FuzzyError::InvalidRegion { region: "medium", .. }));
    }

    #[test]
    fn raise_keeps_the_maximum() {
        let mut grades = Grades::<DensityTerm>::zero();
        assert!(grades.is_empty());
        grades.raise(DensityTerm::High, 0.4);
        grades.raise(DensityTerm::High, 0.2);
        assert!((grades.get(DensityTerm::High) - 0.4).abs() < 1e-12);
        assert!(!grades.is_empty());
    }
}
