//! Discontinuous time span: an ordered union of non-overlapping intervals.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{AnnError, Result};
use crate::localization::interval::TimeInterval;
use crate::localization::point::TimePoint;

/// One discontinuous event, e.g. a word split across a disfluency.
///
/// Intervals are kept sorted by begin point; interiors must not overlap
/// (touching bounds are allowed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeDisjoint {
    intervals: Vec<TimeInterval>,
}

impl TimeDisjoint {
    /// Build from one or more intervals; they are sorted and checked for
    /// overlap.
    pub fn new(mut intervals: Vec<TimeInterval>) -> Result<Self> {
        if intervals.is_empty() {
            return Err(AnnError::DisjointEmpty);
        }
        intervals.sort_by(|a, b| a.begin().fuzzy_cmp(&b.begin()));
        for pair in intervals.windows(2) {
            if pair[0].overlaps_strictly(&pair[1]) {
                return Err(AnnError::DisjointOverlap(pair[1].begin().midpoint()));
            }
        }
        Ok(Self { intervals })
    }

    /// The intervals, in time order.
    #[must_use]
    pub fn intervals(&self) -> &[TimeInterval] {
        &self.intervals
    }

    /// Number of intervals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// A disjoint span is never empty by construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Begin of the first interval.
    #[must_use]
    pub fn begin(&self) -> TimePoint {
        self.intervals[0].begin()
    }

    /// End of the last interval.
    #[must_use]
    pub fn end(&self) -> TimePoint {
        self.intervals[self.intervals.len() - 1].end()
    }

    /// Sum of the durations of the intervals (the gaps do not count).
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.intervals.iter().map(TimeInterval::duration).sum()
    }

    /// Insert one more interval, keeping the span sorted and overlap-free.
    pub fn append_interval(&mut self, interval: TimeInterval) -> Result<()> {
        let mut intervals = self.intervals.clone();
        intervals.push(interval);
        *self = Self::new(intervals)?;
        Ok(())
    }
}

impl fmt::Display for TimeDisjoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, interval) in self.intervals.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{interval}")?;
        }
        write!(f, "}}")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
