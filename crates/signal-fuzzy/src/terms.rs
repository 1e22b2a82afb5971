//! Region names and shapes of the three standard variables.
//!
//! | Variable | Universe | Regions |
//! |---|---|---|
//! | density | 0-100, step 1 | low `(0,0,50)`, medium `(20,50,80)`, high `(50,100,100)` |
//! | waiting time | 0-300 s, step 1 | short `(0,0,60)`, medium `(40,100,160)`, long `(120,200,280)`, very long `(240,300,300)` |
//! | green time | 10-90 s, step 1 | short `(10,10,30)`, medium `(25,40,55)`, long `(50,60,70)`, very long `(65,90,90)` |

use serde::{Deserialize, Serialize};

use crate::membership::Triangle;
use crate::variable::{FuzzyVariable, Term, Universe};

/// Upper bound of the density universe.
pub const DENSITY_MAX: f64 = 100.0;

/// Upper bound of the waiting-time universe, in seconds.
pub const WAITING_MAX: f64 = 300.0;

/// Bounds of the green-time output universe, in seconds.
pub const GREEN_RANGE: (f64, f64) = (10.0, 90.0);

/// Density regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityTerm {
    /// Few vehicles queued.
    Low,
    /// A moderate queue.
    Medium,
    /// A long queue.
    High,
}

impl DensityTerm {
    /// Standard triangle for this region.
    pub const fn shape(self) -> Triangle {
        match self {
            Self::Low => Triangle::new(0.0, 0.0, 50.0),
            Self::Medium => Triangle::new(20.0, 50.0, 80.0),
            Self::High => Triangle::new(50.0, 100.0, 100.0),
        }
    }
}

impl Term for DensityTerm {
    const ALL: &'static [Self] = &[Self::Low, Self::Medium, Self::High];

    fn name(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

/// Waiting-time regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitingTerm {
    /// Up to about a minute.
    Short,
    /// Around a minute and a half.
    Medium,
    /// Several minutes.
    Long,
    /// Close to the five-minute cap.
    VeryLong,
}

impl WaitingTerm {
    /// Standard triangle for this region.
    pub const fn shape(self) -> Triangle {
        match self {
            Self::Short => Triangle::new(0.0, 0.0, 60.0),
            Self::Medium => Triangle::new(40.0, 100.0, 160.0),
            Self::Long => Triangle::new(120.0, 200.0, 280.0),
            Self::VeryLong => Triangle::new(240.0, 300.0, 300.0),
        }
    }
}

impl Term for WaitingTerm {
    const ALL: &'static [Self] = &[Self::Short, Self::Medium, Self::Long, Self::VeryLong];

    fn name(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
            Self::VeryLong => "very_long",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Short => 0,
            Self::Medium => 1,
            Self::Long => 2,
            Self::VeryLong => 3,
        }
    }
}

/// Green-duration output regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreenTerm {
    /// 10-30 s.
    Short,
    /// 25-55 s.
    Medium,
    /// 50-70 s.
    Long,
    /// 65-90 s.
    VeryLong,
}

impl GreenTerm {
    /// Standard triangle for this region.
    pub const fn shape(self) -> Triangle {
        match self {
            Self::Short => Triangle::new(10.0, 10.0, 30.0),
            Self::Medium => Triangle::new(25.0, 40.0, 55.0),
            Self::Long => Triangle::new(50.0, 60.0, 70.0),
            Self::VeryLong => Triangle::new(65.0, 90.0, 90.0),
        }
    }
}

impl Term for GreenTerm {
    const ALL: &'static [Self] = &[Self::Short, Self::Medium, Self::Long, Self::VeryLong];

    fn name(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
            Self::VeryLong => "very_long",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Short => 0,
            Self::Medium => 1,
            Self::Long => 2,
            Self::VeryLong => 3,
        }
    }
}

/// The density input variable.
pub fn density_variable() -> FuzzyVariable<DensityTerm> {
    FuzzyVariable::from_constants(
        "density",
        Universe::from_constants(0.0, DENSITY_MAX, 1.0),
        DensityTerm::shape,
    )
}

/// The waiting-time input variable.
pub fn waiting_variable() -> FuzzyVariable<WaitingTerm> {
    FuzzyVariable::from_constants(
        "waiting_time",
        Universe::from_constants(0.0, WAITING_MAX, 1.0),
        WaitingTerm::shape,
    )
}

/// The green-time output variable.
pub fn green_variable() -> FuzzyVariable<GreenTerm> {
    FuzzyVariable::from_constants(
        "green_time",
        Universe::from_constants(GREEN_RANGE.0, GREEN_RANGE.1, 1.0),
        GreenTerm::shape,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn assert_index_order<T: Term>() {
        for (i, term) in T::ALL.iter().enumerate() {
            assert_eq!(term.index(), i, "{term:?} out of order");
        }
    }

    #[test]
    fn term_indices_follow_all_order() {
        assert_index_order::<DensityTerm>();
        assert_index_order::<WaitingTerm>();
        assert_index_order::<GreenTerm>();
    }

    #[test]
    fn standard_shapes_pass_validation() {
        let density = density_variable();
        FuzzyVariable::new(
            density.name(),
            Universe::new(0.0, DENSITY_MAX, 1.0).unwrap(),
            DensityTerm::shape,
        )
        .unwrap();
        FuzzyVariable::new("w", Universe::new(0.0, WAITING_MAX, 1.0).unwrap(), WaitingTerm::shape)
            .unwrap();
        FuzzyVariable::new(
            "g",
            Universe::new(GREEN_RANGE.0, GREEN_RANGE.1, 1.0).unwrap(),
            GreenTerm::shape,
        )
        .unwrap();
    }

    #[test]
    fn each_region_peaks_at_one() {
        let density = density_variable();
        for &term in DensityTerm::ALL {
            let peak = term.shape().b;
            assert!((density.membership(term, peak) - 1.0).abs() < 1e-12);
        }
        let waiting = waiting_variable();
        for &term in WaitingTerm::ALL {
            let peak = term.shape().b;
            assert!((waiting.membership(term, peak) - 1.0).abs() < 1e-12);
        }
        let green = green_variable();
        for &term in GreenTerm::ALL {
            let peak = term.shape().b;
            assert!((green.membership(term, peak) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn memberships_stay_in_unit_interval() {
        let waiting = waiting_variable();
        let mut x = -50.0;
        while x <= 400.0 {
            for &term in WaitingTerm::ALL {
                let mu = waiting.membership(term, x);
                assert!((0.0..=1.0).contains(&mu), "mu({term:?}, {x}) = {mu}");
            }
            x += 0.5;
        }
    }
}
