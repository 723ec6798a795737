//! Localization primitives: where in time an annotated event happens.
//!
//! A [`Localization`] is a point, an interval, or a disjoint union of
//! intervals. A [`Location`] holds one or more alternative localizations,
//! each with an optional confidence score, with exactly one "best"
//! alternative at any time.

pub mod disjoint;
pub mod interval;
pub mod point;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{AnnError, Result};
use self::disjoint::TimeDisjoint;
use self::interval::TimeInterval;
use self::point::TimePoint;

// ─────────────────────────────────────────────────────────────────────────────
// Localization
// ─────────────────────────────────────────────────────────────────────────────

/// The kind of a localization; tiers are uniformly typed by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalizationKind {
    /// A single fuzzy instant.
    Point,
    /// A contiguous span.
    Interval,
    /// A discontinuous span.
    Disjoint,
}

impl LocalizationKind {
    /// Lowercase name, used in error messages and serialized files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Interval => "interval",
            Self::Disjoint => "disjoint",
        }
    }
}

impl fmt::Display for LocalizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One concrete placement in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Localization {
    /// A single fuzzy instant.
    Point(TimePoint),
    /// A contiguous span.
    Interval(TimeInterval),
    /// A discontinuous span.
    Disjoint(TimeDisjoint),
}

impl Localization {
    /// The kind of this localization.
    #[must_use]
    pub fn kind(&self) -> LocalizationKind {
        match self {
            Self::Point(_) => LocalizationKind::Point,
            Self::Interval(_) => LocalizationKind::Interval,
            Self::Disjoint(_) => LocalizationKind::Disjoint,
        }
    }

    /// Earliest point of the localization (the point itself for a point).
    #[must_use]
    pub fn start_point(&self) -> TimePoint {
        match self {
            Self::Point(p) => *p,
            Self::Interval(i) => i.begin(),
            Self::Disjoint(d) => d.begin(),
        }
    }

    /// Latest point of the localization.
    #[must_use]
    pub fn end_point(&self) -> TimePoint {
        match self {
            Self::Point(p) => *p,
            Self::Interval(i) => i.end(),
            Self::Disjoint(d) => d.end(),
        }
    }

    /// Covered duration; zero for a point, gap-free sum for a disjoint.
    #[must_use]
    pub fn duration(&self) -> f64 {
        match self {
            Self::Point(_) => 0.0,
            Self::Interval(i) => i.duration(),
            Self::Disjoint(d) => d.duration(),
        }
    }

    /// Non-strict fuzzy containment of `other`, used by the time-alignment
    /// hierarchy check.
    ///
    /// A point contains only fuzzy-equal points; an interval contains any
    /// localization whose full span fits inside it; a disjoint contains
    /// `other` when one of its intervals does.
    #[must_use]
    pub fn contains(&self, other: &Localization) -> bool {
        match self {
            Self::Point(p) => match other {
                Localization::Point(q) => p.fuzzy_eq(q),
                _ => false,
            },
            Self::Interval(i) => {
                i.contains_point(&other.start_point()) && i.contains_point(&other.end_point())
            }
            Self::Disjoint(d) => d.intervals().iter().any(|i| {
                i.contains_point(&other.start_point()) && i.contains_point(&other.end_point())
            }),
        }
    }

    /// Fuzzy span equality: same kind, fuzzy-equal start and end points.
    #[must_use]
    pub fn fuzzy_eq(&self, other: &Localization) -> bool {
        self.kind() == other.kind()
            && self.start_point().fuzzy_eq(&other.start_point())
            && self.end_point().fuzzy_eq(&other.end_point())
    }
}

impl From<TimePoint> for Localization {
    fn from(p: TimePoint) -> Self {
        Self::Point(p)
    }
}

impl From<TimeInterval> for Localization {
    fn from(i: TimeInterval) -> Self {
        Self::Interval(i)
    }
}

impl From<TimeDisjoint> for Localization {
    fn from(d: TimeDisjoint) -> Self {
        Self::Disjoint(d)
    }
}

impl fmt::Display for Localization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Point(p) => write!(f, "{p}"),
            Self::Interval(i) => write!(f, "{i}"),
            Self::Disjoint(d) => write!(f, "{d}"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Location
// ─────────────────────────────────────────────────────────────────────────────

/// One or more alternative localizations with confidence scores.
///
/// "The event might be at T1 OR T2, score s1 vs s2" — with exactly one
/// best alternative: the highest-scored one, ties and unscored
/// alternatives resolved to the earliest-added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    alternatives: Vec<(Localization, Option<f64>)>,
}

impl Location {
    /// A location with a single, unscored localization.
    #[must_use]
    pub fn new(localization: impl Into<Localization>) -> Self {
        Self {
            alternatives: vec![(localization.into(), None)],
        }
    }

    /// A location with a single scored localization.
    #[must_use]
    pub fn with_score(localization: impl Into<Localization>, score: f64) -> Self {
        Self {
            alternatives: vec![(localization.into(), Some(score))],
        }
    }

    /// Add an alternative localization. All alternatives of one location
    /// must share the same kind.
    pub fn add_alternative(
        &mut self,
        localization: impl Into<Localization>,
        score: Option<f64>,
    ) -> Result<()> {
        let localization = localization.into();
        if localization.kind() != self.kind() {
            return Err(AnnError::Type {
                value: localization.kind().to_string(),
                expected: self.kind().name(),
            });
        }
        self.alternatives.push((localization, score));
        Ok(())
    }

    /// The kind shared by every alternative.
    #[must_use]
    pub fn kind(&self) -> LocalizationKind {
        self.alternatives[0].0.kind()
    }

    /// The best alternative: highest score, ties broken by insertion order.
    #[must_use]
    pub fn best(&self) -> &Localization {
        &self.alternatives[self.best_index()].0
    }

    /// Score of the best alternative.
    #[must_use]
    pub fn best_score(&self) -> Option<f64> {
        self.alternatives[self.best_index()].1
    }

    /// Replace the best alternative with `localization`, keeping its score.
    pub fn set_best(&mut self, localization: impl Into<Localization>) -> Result<()> {
        let localization = localization.into();
        if localization.kind() != self.kind() && self.alternatives.len() > 1 {
            return Err(AnnError::Type {
                value: localization.kind().to_string(),
                expected: self.kind().name(),
            });
        }
        let best = self.best_index();
        self.alternatives[best].0 = localization;
        Ok(())
    }

    /// All alternatives with their scores, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Localization, Option<f64>)> {
        self.alternatives.iter().map(|(l, s)| (l, *s))
    }

    /// Number of alternatives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    /// A location always holds at least one alternative.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    fn best_index(&self) -> usize {
        let mut best = 0;
        for (i, (_, score)) in self.alternatives.iter().enumerate().skip(1) {
            let s = score.unwrap_or(f64::NEG_INFINITY);
            if s > self.alternatives[best].1.unwrap_or(f64::NEG_INFINITY) {
                best = i;
            }
        }
        best
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn iv(b: f64, e: f64) -> TimeInterval {
        TimeInterval::from_bounds(b, e).unwrap()
    }

    #[test]
    fn kind_and_span_accessors() {
        let loc = Localization::from(iv(1.0, 2.0));
        assert_eq!(loc.kind(), LocalizationKind::Interval);
        assert_eq!(loc.start_point().midpoint(), 1.0);
        assert_eq!(loc.end_point().midpoint(), 2.0);
        assert_eq!(loc.duration(), 1.0);

        let loc = Localization::from(TimePoint::new(1.5));
        assert_eq!(loc.kind(), LocalizationKind::Point);
        assert_eq!(loc.duration(), 0.0);
    }

    #[test]
    fn interval_contains_interval_and_point() {
        let outer = Localization::from(iv(0.0, 3.0));
        assert!(outer.contains(&Localization::from(iv(1.0, 2.0))));
        assert!(outer.contains(&Localization::from(iv(0.0, 3.0))));
        assert!(outer.contains(&Localization::from(TimePoint::new(1.5))));
        assert!(!outer.contains(&Localization::from(iv(2.0, 3.5))));
    }

    #[test]
    fn point_contains_only_fuzzy_equal_points() {
        let p = Localization::from(TimePoint::with_radius(1.0, 0.1).unwrap());
        assert!(p.contains(&Localization::from(TimePoint::new(1.05))));
        assert!(!p.contains(&Localization::from(TimePoint::new(1.5))));
        assert!(!p.contains(&Localization::from(iv(0.9, 1.1))));
    }

    #[test]
    fn disjoint_contains_within_one_interval() {
        let d = TimeDisjoint::new(vec![iv(0.0, 1.0), iv(2.0, 3.0)]).unwrap();
        let d = Localization::from(d);
        assert!(d.contains(&Localization::from(iv(2.0, 2.5))));
        // spanning the gap is not containment
        assert!(!d.contains(&Localization::from(iv(0.5, 2.5))));
    }

    #[test]
    fn location_best_is_highest_scored() {
        let mut loc = Location::with_score(iv(0.0, 1.0), 0.2);
        loc.add_alternative(iv(0.1, 1.1), Some(0.8)).unwrap();
        loc.add_alternative(iv(0.2, 1.2), Some(0.5)).unwrap();
        assert_eq!(loc.best().start_point().midpoint(), 0.1);
        assert_eq!(loc.best_score(), Some(0.8));
    }

    #[test]
    fn location_unscored_best_is_first() {
        let mut loc = Location::new(iv(0.0, 1.0));
        loc.add_alternative(iv(5.0, 6.0), None).unwrap();
        assert_eq!(loc.best().start_point().midpoint(), 0.0);
        assert_eq!(loc.best_score(), None);
    }

    #[test]
    fn location_rejects_mixed_kinds() {
        let mut loc = Location::new(iv(0.0, 1.0));
        assert_matches!(
            loc.add_alternative(TimePoint::new(0.5), None),
            Err(AnnError::Type { .. })
        );
    }

    #[test]
    fn set_best_replaces_highest_scored() {
        let mut loc = Location::with_score(iv(0.0, 1.0), 0.2);
        loc.add_alternative(iv(0.1, 1.1), Some(0.8)).unwrap();
        loc.set_best(iv(4.0, 5.0)).unwrap();
        assert_eq!(loc.best().start_point().midpoint(), 4.0);
        assert_eq!(loc.len(), 2);
    }
}
