//! Time interval bounded by two fuzzy points.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{AnnError, Result};
use crate::localization::point::TimePoint;

/// A span of time with invariant `begin < end` under fuzzy ordering.
///
/// The invariant is checked at construction and on every bound mutation:
/// an interval whose end fuzzy-compares equal to (or before) its begin is
/// rejected with [`AnnError::IntervalBounds`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeInterval {
    begin: TimePoint,
    end: TimePoint,
}

impl TimeInterval {
    /// Build an interval; `begin` must be strictly before `end`.
    pub fn new(begin: TimePoint, end: TimePoint) -> Result<Self> {
        if begin.fuzzy_cmp(&end) != std::cmp::Ordering::Less {
            return Err(AnnError::IntervalBounds {
                begin: begin.midpoint(),
                end: end.midpoint(),
            });
        }
        Ok(Self { begin, end })
    }

    /// Shorthand for an interval between two radius-less midpoints.
    pub fn from_bounds(begin: f64, end: f64) -> Result<Self> {
        Self::new(TimePoint::new(begin), TimePoint::new(end))
    }

    /// The begin point.
    #[must_use]
    pub fn begin(&self) -> TimePoint {
        self.begin
    }

    /// The end point.
    #[must_use]
    pub fn end(&self) -> TimePoint {
        self.end
    }

    /// Midpoint-to-midpoint duration.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end.midpoint() - self.begin.midpoint()
    }

    /// Replace the begin point, re-checking the invariant.
    pub fn set_begin(&mut self, begin: TimePoint) -> Result<()> {
        *self = Self::new(begin, self.end)?;
        Ok(())
    }

    /// Replace the end point, re-checking the invariant.
    pub fn set_end(&mut self, end: TimePoint) -> Result<()> {
        *self = Self::new(self.begin, end)?;
        Ok(())
    }

    /// Whether `point` falls inside the interval, bounds included (fuzzy).
    #[must_use]
    pub fn contains_point(&self, point: &TimePoint) -> bool {
        use std::cmp::Ordering::Greater;
        self.begin.fuzzy_cmp(point) != Greater && point.fuzzy_cmp(&self.end) != Greater
    }

    /// Non-strict fuzzy containment of another interval.
    #[must_use]
    pub fn contains(&self, other: &TimeInterval) -> bool {
        use std::cmp::Ordering::Greater;
        self.begin.fuzzy_cmp(&other.begin) != Greater && other.end.fuzzy_cmp(&self.end) != Greater
    }

    /// Whether the two intervals share any time, touching bounds included.
    #[must_use]
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        use std::cmp::Ordering::Less;
        // self.begin <= other.end && other.begin <= self.end
        other.end.fuzzy_cmp(&self.begin) != Less && self.end.fuzzy_cmp(&other.begin) != Less
    }

    /// Whether the interiors of the two intervals share time: touching
    /// bounds do NOT count.
    #[must_use]
    pub fn overlaps_strictly(&self, other: &TimeInterval) -> bool {
        use std::cmp::Ordering::Less;
        self.begin.fuzzy_cmp(&other.end) == Less && other.begin.fuzzy_cmp(&self.end) == Less
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.begin, self.end)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn valid_interval() {
        let i = TimeInterval::from_bounds(1.0, 2.0).unwrap();
        assert_eq!(i.begin().midpoint(), 1.0);
        assert_eq!(i.end().midpoint(), 2.0);
        assert_eq!(i.duration(), 1.0);
    }

    #[test]
    fn reversed_bounds_rejected() {
        assert_matches!(
            TimeInterval::from_bounds(2.0, 1.0),
            Err(AnnError::IntervalBounds { begin, end }) if begin == 2.0 && end == 1.0
        );
    }

    #[test]
    fn degenerate_interval_rejected() {
        assert_matches!(
            TimeInterval::from_bounds(1.0, 1.0),
            Err(AnnError::IntervalBounds { .. })
        );
    }

    #[test]
    fn fuzzy_equal_bounds_rejected() {
        // begin and end overlap through their radii, so begin < end fails.
        let begin = TimePoint::with_radius(1.0, 0.2).unwrap();
        let end = TimePoint::with_radius(1.3, 0.2).unwrap();
        assert_matches!(
            TimeInterval::new(begin, end),
            Err(AnnError::IntervalBounds { .. })
        );
    }

    #[test]
    fn set_begin_revalidates() {
        let mut i = TimeInterval::from_bounds(1.0, 2.0).unwrap();
        assert_matches!(
            i.set_begin(TimePoint::new(3.0)),
            Err(AnnError::IntervalBounds { .. })
        );
        // rejected mutation left the interval unchanged
        assert_eq!(i.begin().midpoint(), 1.0);
        i.set_begin(TimePoint::new(0.5)).unwrap();
        assert_eq!(i.begin().midpoint(), 0.5);
    }

    #[test]
    fn contains_point_bounds_included() {
        let i = TimeInterval::from_bounds(1.0, 2.0).unwrap();
        assert!(i.contains_point(&TimePoint::new(1.0)));
        assert!(i.contains_point(&TimePoint::new(1.5)));
        assert!(i.contains_point(&TimePoint::new(2.0)));
        assert!(!i.contains_point(&TimePoint::new(2.1)));
    }

    #[test]
    fn containment_is_non_strict() {
        let outer = TimeInterval::from_bounds(1.0, 3.0).unwrap();
        let inner = TimeInterval::from_bounds(1.0, 2.0).unwrap();
        assert!(outer.contains(&inner));
        assert!(outer.contains(&outer));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn touching_intervals_overlap_but_not_strictly() {
        let a = TimeInterval::from_bounds(0.0, 1.0).unwrap();
        let b = TimeInterval::from_bounds(1.0, 2.0).unwrap();
        let c = TimeInterval::from_bounds(2.5, 3.0).unwrap();
        assert!(a.overlaps(&b));
        assert!(!a.overlaps_strictly(&b));
        assert!(!a.overlaps(&c));
    }
}
