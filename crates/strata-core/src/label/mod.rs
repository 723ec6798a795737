//! Labels: weighted sets of alternative tags for one annotated event.

pub mod compare;
pub mod fuzzy;
pub mod tag;

use serde::{Deserialize, Serialize};

use crate::errors::{AnnError, Result};
use self::compare::{MatchLogic, TagPredicate};
use self::tag::Tag;

/// A probability distribution over possible readings of one time span.
///
/// A label holds one or more `(tag, score)` alternatives of a single tag
/// type. Exactly one alternative is "best": the highest-scored one, ties
/// and unscored alternatives resolved to the earliest-added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    alternatives: Vec<(Tag, Option<f64>)>,
    key: Option<String>,
}

impl Label {
    /// A label with a single, unscored tag.
    #[must_use]
    pub fn new(tag: Tag) -> Self {
        Self {
            alternatives: vec![(tag, None)],
            key: None,
        }
    }

    /// A label with a single scored tag.
    #[must_use]
    pub fn with_score(tag: Tag, score: f64) -> Self {
        Self {
            alternatives: vec![(tag, Some(score))],
            key: None,
        }
    }

    /// Add an alternative tag.
    ///
    /// All tags of one label share one type; a mismatch is a typed error.
    /// Appending a tag that is already present merges the scores (their
    /// sum) instead of duplicating the alternative.
    pub fn append(&mut self, tag: Tag, score: Option<f64>) -> Result<()> {
        if tag.type_name() != self.tag_type() {
            return Err(AnnError::Type {
                value: tag.content(),
                expected: self.alternatives[0].0.type_name(),
            });
        }
        if let Some(existing) = self.alternatives.iter_mut().find(|(t, _)| *t == tag) {
            existing.1 = match (existing.1, score) {
                (Some(a), Some(b)) => Some(a + b),
                (old, None) => old,
                (None, new) => new,
            };
            return Ok(());
        }
        self.alternatives.push((tag, score));
        Ok(())
    }

    /// The best tag: maximum score, ties broken by first occurrence;
    /// with no scores at all, the first tag.
    #[must_use]
    pub fn best(&self) -> &Tag {
        &self.alternatives[self.best_index()].0
    }

    /// Score of the best tag.
    #[must_use]
    pub fn best_score(&self) -> Option<f64> {
        self.alternatives[self.best_index()].1
    }

    /// Score of a given tag, if the tag is present and scored.
    #[must_use]
    pub fn score_of(&self, tag: &Tag) -> Option<f64> {
        self.alternatives
            .iter()
            .find(|(t, _)| t == tag)
            .and_then(|(_, s)| *s)
    }

    /// Set the score of a present tag. Returns `false` when absent.
    pub fn set_score(&mut self, tag: &Tag, score: f64) -> bool {
        match self.alternatives.iter_mut().find(|(t, _)| t == tag) {
            Some(entry) => {
                entry.1 = Some(score);
                true
            }
            None => false,
        }
    }

    /// The shared type name of the alternatives.
    #[must_use]
    pub fn tag_type(&self) -> &'static str {
        self.alternatives[0].0.type_name()
    }

    /// Alternatives with their scores, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Tag, Option<f64>)> {
        self.alternatives.iter().map(|(t, s)| (t, *s))
    }

    /// Number of alternative tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    /// A label always holds at least one tag.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Optional caller-assigned key.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Assign or clear the key.
    pub fn set_key(&mut self, key: Option<&str>) {
        self.key = key.map(ToOwned::to_owned);
    }

    /// Whether any alternative tag satisfies the predicates.
    ///
    /// Each `(predicate, negate)` pair is evaluated against a tag and the
    /// results are combined with `logic`; the label matches when at least
    /// one of its alternatives passes the combination.
    #[must_use]
    pub fn matches(&self, predicates: &[(TagPredicate, bool)], logic: MatchLogic) -> bool {
        self.alternatives.iter().any(|(tag, _)| {
            let mut results = predicates.iter().map(|(p, negate)| p.eval(tag) != *negate);
            match logic {
                MatchLogic::All => results.all(|r| r),
                MatchLogic::Any => results.any(|r| r),
            }
        })
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
