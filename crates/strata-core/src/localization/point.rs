//! Time point with a measurement-uncertainty radius.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{AnnError, Result};

/// A time instant with an optional uncertainty radius, in seconds.
///
/// Two points are equal when their uncertainty intervals overlap:
/// `|p1.midpoint - p2.midpoint| <= p1.radius + p2.radius`, a missing radius
/// counting as zero. Ordering is defined consistently with this fuzzy
/// equality: two "equal" points are neither `<` nor `>` each other.
///
/// The relation is deliberately NOT a mathematical equivalence: with large
/// radii, three points can pairwise compare equal without forming a true
/// equivalence class. This is an accepted modeling choice — sorting and tier
/// invariants rely only on the `Less`/`Greater` results of [`fuzzy_cmp`],
/// and no code infers equivalence classes from pairwise equality.
///
/// [`fuzzy_cmp`]: TimePoint::fuzzy_cmp
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimePoint {
    midpoint: f64,
    radius: Option<f64>,
}

impl TimePoint {
    /// A point with no vagueness.
    #[must_use]
    pub fn new(midpoint: f64) -> Self {
        Self {
            midpoint,
            radius: None,
        }
    }

    /// A point with an explicit radius. Negative radii are rejected.
    pub fn with_radius(midpoint: f64, radius: f64) -> Result<Self> {
        if radius < 0.0 {
            return Err(AnnError::NegativeValue(radius));
        }
        Ok(Self {
            midpoint,
            radius: Some(radius),
        })
    }

    /// The midpoint value.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        self.midpoint
    }

    /// The radius, if one was assigned.
    #[must_use]
    pub fn radius(&self) -> Option<f64> {
        self.radius
    }

    /// The radius, a missing one counting as zero.
    #[must_use]
    pub fn radius_or_zero(&self) -> f64 {
        self.radius.unwrap_or(0.0)
    }

    /// Move the midpoint, keeping the radius.
    pub fn set_midpoint(&mut self, midpoint: f64) {
        self.midpoint = midpoint;
    }

    /// Assign a radius. Negative radii are rejected.
    pub fn set_radius(&mut self, radius: Option<f64>) -> Result<()> {
        if let Some(r) = radius {
            if r < 0.0 {
                return Err(AnnError::NegativeValue(r));
            }
        }
        self.radius = radius;
        Ok(())
    }

    /// Whether the uncertainty intervals of the two points overlap.
    #[must_use]
    pub fn fuzzy_eq(&self, other: &TimePoint) -> bool {
        let delta = (self.midpoint - other.midpoint).abs();
        delta <= self.radius_or_zero() + other.radius_or_zero()
    }

    /// Tolerance-aware three-way comparison.
    ///
    /// Returns `Equal` when the points are fuzzy-equal, otherwise the
    /// ordering of the midpoints.
    #[must_use]
    pub fn fuzzy_cmp(&self, other: &TimePoint) -> Ordering {
        if self.fuzzy_eq(other) {
            Ordering::Equal
        } else {
            self.midpoint.total_cmp(&other.midpoint)
        }
    }
}

impl PartialEq for TimePoint {
    fn eq(&self, other: &Self) -> bool {
        self.fuzzy_eq(other)
    }
}

impl PartialOrd for TimePoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.fuzzy_cmp(other))
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.radius {
            Some(r) => write!(f, "({}, {})", self.midpoint, r),
            None => write!(f, "{}", self.midpoint),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    #[test]
    fn exact_points_compare_exactly() {
        let a = TimePoint::new(1.0);
        let b = TimePoint::new(1.0);
        let c = TimePoint::new(2.0);
        assert_eq!(a, b);
        assert!(a < c);
        assert!(c > a);
    }

    #[test]
    fn radius_widens_equality() {
        let a = TimePoint::with_radius(1.0, 0.1).unwrap();
        let b = TimePoint::with_radius(1.15, 0.1).unwrap();
        // |1.0 - 1.15| = 0.15 <= 0.2
        assert_eq!(a, b);
        assert_eq!(a.fuzzy_cmp(&b), Ordering::Equal);
    }

    #[test]
    fn outside_radius_is_ordered() {
        let a = TimePoint::with_radius(1.0, 0.05).unwrap();
        let b = TimePoint::with_radius(1.2, 0.05).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.fuzzy_cmp(&b), Ordering::Less);
        assert_eq!(b.fuzzy_cmp(&a), Ordering::Greater);
    }

    #[test]
    fn missing_radius_counts_as_zero() {
        let a = TimePoint::new(1.0);
        let b = TimePoint::with_radius(1.1, 0.1).unwrap();
        assert_eq!(a, b);
        let c = TimePoint::with_radius(1.11, 0.1).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn negative_radius_rejected() {
        assert_matches!(
            TimePoint::with_radius(1.0, -0.1),
            Err(AnnError::NegativeValue(r)) if r == -0.1
        );
        let mut p = TimePoint::new(1.0);
        assert_matches!(p.set_radius(Some(-1.0)), Err(AnnError::NegativeValue(_)));
    }

    #[test]
    fn equal_points_are_neither_less_nor_greater() {
        let a = TimePoint::with_radius(1.0, 0.5).unwrap();
        let b = TimePoint::with_radius(1.4, 0.5).unwrap();
        assert!(a.fuzzy_eq(&b));
        assert!(!(a < b));
        assert!(!(a > b));
    }

    #[test]
    fn pairwise_equality_is_not_transitive() {
        // Documented limitation: a == b, b == c, a != c.
        let a = TimePoint::with_radius(0.0, 0.6).unwrap();
        let b = TimePoint::with_radius(1.0, 0.6).unwrap();
        let c = TimePoint::with_radius(2.0, 0.6).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn display_forms() {
        assert_eq!(TimePoint::new(1.5).to_string(), "1.5");
        assert_eq!(
            TimePoint::with_radius(1.5, 0.005).unwrap().to_string(),
            "(1.5, 0.005)"
        );
    }

    proptest! {
        #[test]
        fn equality_matches_the_radius_sum_rule(
            m1 in -100.0f64..100.0, r1 in 0.0f64..5.0,
            m2 in -100.0f64..100.0, r2 in 0.0f64..5.0,
        ) {
            let p1 = TimePoint::with_radius(m1, r1).unwrap();
            let p2 = TimePoint::with_radius(m2, r2).unwrap();
            prop_assert_eq!(p1 == p2, (m1 - m2).abs() <= r1 + r2);
        }

        #[test]
        fn fuzzy_eq_is_symmetric(
            m1 in -100.0f64..100.0, r1 in 0.0f64..5.0,
            m2 in -100.0f64..100.0, r2 in 0.0f64..5.0,
        ) {
            let p1 = TimePoint::with_radius(m1, r1).unwrap();
            let p2 = TimePoint::with_radius(m2, r2).unwrap();
            prop_assert_eq!(p1.fuzzy_eq(&p2), p2.fuzzy_eq(&p1));
        }

        #[test]
        fn cmp_reverses(
            m1 in -100.0f64..100.0, r1 in 0.0f64..5.0,
            m2 in -100.0f64..100.0, r2 in 0.0f64..5.0,
        ) {
            let p1 = TimePoint::with_radius(m1, r1).unwrap();
            let p2 = TimePoint::with_radius(m2, r2).unwrap();
            prop_assert_eq!(p1.fuzzy_cmp(&p2), p2.fuzzy_cmp(&p1).reverse());
        }
    }
}
