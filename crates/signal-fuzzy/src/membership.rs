//! Triangular membership functions.
//!
//! A region `(a, b, c)` ramps linearly from 0 at `a` to 1 at `b` and back to
//! 0 at `c`. Degenerate edges are allowed: `a == b` gives a left shoulder and
//! `b == c` a right shoulder, and in both cases the grade at `b` is 1.

use serde::{Deserialize, Serialize};

/// A triangular membership function over `[a, c]` peaking at `b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    /// Left foot.
    pub a: f64,
    /// Peak.
    pub b: f64,
    /// Right foot.
    pub c: f64,
}

impl Triangle {
    /// Build a triangle from its three points. Use [`Triangle::is_valid`]
    /// to check ordering before relying on the grades.
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Whether all points are finite and `a <= b <= c`.
    pub fn is_valid(&self) -> bool {
        self.a.is_finite()
            && self.b.is_finite()
            && self.c.is_finite()
            && self.a <= self.b
            && self.b <= self.c
    }

    /// Membership grade of `x`, in `[0, 1]`.
    ///
    /// The caller is responsible for clamping `x` into the owning
    /// universe; this function only evaluates the shape.
    pub fn grade(&self, x: f64) -> f64 {
        let Self { a, b, c } = *self;
        if x.is_nan() || x < a || x > c {
            0.0
        } else if x < b {
            ((x - a) / (b - a)).clamp(0.0, 1.0)
        } else if x > b {
            ((c - x) / (c - b)).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}
