//! Aggregation and centroid defuzzification.

use crate::variable::{FuzzyVariable, Grades, Term};

/// Clip every region of `output` at its activation and take the point-wise
/// maximum, sampled across the output universe.
///
/// Returns `(x, y)` pairs in ascending `x`.
pub fn aggregate<T: Term>(output: &FuzzyVariable<T>, activations: &Grades<T>) -> Vec<(f64, f64)> {
    output
        .universe()
        .samples()
        .into_iter()
        .map(|x| {
            let y = activations
                .iter()
                .map(|(term, level)| output.membership(term, x).min(level))
                .fold(0.0, f64::max);
            (x, y)
        })
        .collect()
}

/// Area centroid of a sampled, piecewise-linear curve.
///
/// Each segment between consecutive samples is treated as a trapezoid.
/// Returns `None` when the total area is zero.
pub fn centroid(points: &[(f64, f64)]) -> Option<f64> {
    let mut area = 0.0;
    let mut moment = 0.0;
    for pair in points.windows(2) {
        let &[(x1, y1), (x2, y2)] = pair else {
            continue;
        };
        let height = y1 + y2;
        if height <= 0.0 {
            continue;
        }
        let dx = x2 - x1;
        let segment_area = 0.5 * dx * height;
        let segment_cx = x1 + dx * y2.mul_add(2.0, y1) / (3.0 * height);
        area += segment_area;
        moment += segment_area * segment_cx;
    }
    (area > 0.0).then(|| moment / area)
}

/// Aggregate then take the centroid.
pub fn defuzzify<T: Term>(output: &FuzzyVariable<T>, activations: &Grades<T>) -> Option<f64> {
    centroid(&aggregate(output, activations))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::terms::{GreenTerm, green_variable};

    fn only(term: GreenTerm, level: f64) -> Grades<GreenTerm> {
        Grades::from_fn(|t| if t == term { level } else { 0.0 })
    }

    #[test]
    fn centroid_of_rectangle_is_its_midpoint() {
        let points = [(0.0, 1.0), (1.0, 1.0), (2.0, 1.0)];
        assert!((centroid(&points).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_curve_has_no_centroid() {
        assert_eq!(centroid(&[(0.0, 0.0), (1.0, 0.0)]), None);
        assert_eq!(centroid(&[]), None);
        let green = green_variable();
        assert_eq!(defuzzify(&green, &Grades::zero()), None);
    }

    #[test]
    fn short_shoulder_alone_gives_its_centroid() {
        let green = green_variable();
        let value = defuzzify(&green, &only(GreenTerm::Short, 1.0)).unwrap();
        assert!((value - (10.0 + 20.0 / 3.0)).abs() < 1e-9, "got {value}");
    }

    #[test]
    fn symmetric_region_alone_gives_its_peak() {
        let green = green_variable();
        for level in [0.2, 0.5, 1.0] {
            let value = defuzzify(&green, &only(GreenTerm::Medium, level)).unwrap();
            assert!((value - 40.0).abs() < 1e-9, "level {level} gave {value}");
        }
    }

    #[test]
    fn raising_very_long_never_lowers_output() {
        let green = green_variable();
        let mut previous = f64::NEG_INFINITY;
        for step in 0..=10 {
            let very_long = f64::from(step) / 10.0;
            let activations = Grades::from_fn(|t| match t {
                GreenTerm::Short => 0.3,
                GreenTerm::Medium => 0.5,
                GreenTerm::Long => 0.2,
                GreenTerm::VeryLong => very_long,
            });
            let value = defuzzify(&green, &activations).unwrap();
            assert!(value >= previous - 1e-9, "{value} < {previous} at vl={very_long}");
            previous = value;
        }
    }

    #[test]
    fn output_stays_inside_universe() {
        let green = green_variable();
        let value = defuzzify(&green, &only(GreenTerm::VeryLong, 1.0)).unwrap();
        assert!(value > 65.0 && value <= 90.0);
    }
}
