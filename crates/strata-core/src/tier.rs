//! A named, ordered channel of time-anchored annotations.

use std::cmp::Ordering;

use serde::Serialize;

use crate::annotation::Annotation;
use crate::annset::AnnSet;
use crate::ctrlvocab::CtrlVocab;
use crate::errors::{AnnError, Result};
use crate::label::compare::{MatchLogic, TagPredicate};
use crate::label::tag::normalize_text;
use crate::localization::{LocalizationKind, point::TimePoint};
use crate::media::Media;
use crate::metadata::Metadata;

/// An ordered, gap-tolerant sequence of non-overlapping annotations.
///
/// A tier is globally typed: the first appended annotation fixes the
/// localization kind (point, interval or disjoint) and every further
/// annotation must match it. Annotations are kept in non-decreasing time
/// order; on interval and disjoint tiers two annotations may not overlap
/// unless the tier was explicitly created overlap-tolerant.
#[derive(Debug, Clone, Serialize)]
pub struct Tier {
    meta: Metadata,
    name: String,
    annotations: Vec<Annotation>,
    media: Option<Media>,
    ctrl_vocab: Option<CtrlVocab>,
    allow_overlaps: bool,
}

fn normalize_name(name: &str) -> String {
    normalize_text(name).replace(' ', "_")
}

impl Tier {
    /// An empty tier. The name is whitespace-normalized.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            meta: Metadata::new(),
            name: normalize_name(name),
            annotations: Vec::new(),
            media: None,
            ctrl_vocab: None,
            allow_overlaps: false,
        }
    }

    /// An empty tier that tolerates overlapping annotations, for formats
    /// that allow them.
    #[must_use]
    pub fn new_with_overlaps(name: &str) -> Self {
        let mut tier = Self::new(name);
        tier.allow_overlaps = true;
        tier
    }

    // ── Identity and attachments ─────────────────────────────────────────

    /// The normalized name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the tier.
    pub fn set_name(&mut self, name: &str) {
        self.name = normalize_name(name);
    }

    /// The identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.meta.id()
    }

    /// The metadata store.
    #[must_use]
    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    /// Mutable access to the metadata store.
    pub fn meta_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }

    /// The attached media, if any.
    #[must_use]
    pub fn media(&self) -> Option<&Media> {
        self.media.as_ref()
    }

    /// Attach or detach a media reference.
    pub fn set_media(&mut self, media: Option<Media>) {
        self.media = media;
    }

    /// The controlled vocabulary, if any.
    #[must_use]
    pub fn ctrl_vocab(&self) -> Option<&CtrlVocab> {
        self.ctrl_vocab.as_ref()
    }

    /// Attach a controlled vocabulary. Every tag already on the tier must
    /// be an entry of it.
    pub fn set_ctrl_vocab(&mut self, vocab: Option<CtrlVocab>) -> Result<()> {
        if let Some(ref v) = vocab {
            for ann in &self.annotations {
                Self::check_vocab(v, ann)?;
            }
        }
        self.ctrl_vocab = vocab;
        Ok(())
    }

    /// Whether the tier tolerates overlapping annotations.
    #[must_use]
    pub fn allows_overlaps(&self) -> bool {
        self.allow_overlaps
    }

    // ── Typing ───────────────────────────────────────────────────────────

    /// Localization kind of the tier, fixed by its first annotation.
    #[must_use]
    pub fn kind(&self) -> Option<LocalizationKind> {
        self.annotations.first().map(Annotation::kind)
    }

    /// Whether this is a point tier.
    #[must_use]
    pub fn is_point(&self) -> bool {
        self.kind() == Some(LocalizationKind::Point)
    }

    /// Whether this is an interval tier.
    #[must_use]
    pub fn is_interval(&self) -> bool {
        self.kind() == Some(LocalizationKind::Interval)
    }

    /// Whether this is a disjoint tier.
    #[must_use]
    pub fn is_disjoint(&self) -> bool {
        self.kind() == Some(LocalizationKind::Disjoint)
    }

    // ── Content access ───────────────────────────────────────────────────

    /// The annotations, in time order.
    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Annotation at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Annotation> {
        self.annotations.get(index)
    }

    /// Mutable annotation at `index`.
    ///
    /// Mutating a location through this accessor bypasses hierarchy
    /// validation; prefer the `Transcription` mutation methods when the
    /// tier is part of a hierarchy.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Annotation> {
        self.annotations.get_mut(index)
    }

    /// Number of annotations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Whether the tier has no annotation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Iterate the annotations in time order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    /// First annotation.
    #[must_use]
    pub fn first(&self) -> Option<&Annotation> {
        self.annotations.first()
    }

    /// Last annotation.
    #[must_use]
    pub fn last(&self) -> Option<&Annotation> {
        self.annotations.last()
    }

    // ── Mutation ─────────────────────────────────────────────────────────

    /// Build an annotation and insert it at its sorted position.
    ///
    /// Returns the insertion index. This validates the tier type, the
    /// overlap policy and the controlled vocabulary — but NOT hierarchy
    /// links; a tier registered in a hierarchy is mutated through its
    /// `Transcription`.
    pub fn create_annotation(
        &mut self,
        location: crate::localization::Location,
        labels: Vec<crate::label::Label>,
    ) -> Result<usize> {
        self.append(Annotation::with_labels(location, labels))
    }

    /// Insert a ready-made annotation at its sorted position.
    pub fn append(&mut self, ann: Annotation) -> Result<usize> {
        if let Some(kind) = self.kind() {
            if ann.kind() != kind {
                return Err(AnnError::TierTypeMismatch {
                    tier: self.name.clone(),
                    expected: kind.name(),
                    found: ann.kind().name(),
                });
            }
        }
        if let Some(ref vocab) = self.ctrl_vocab {
            Self::check_vocab(vocab, &ann)?;
        }

        // O(n) insertion search; tiers are typically small enough.
        let start = ann.start_point();
        let index = self
            .annotations
            .iter()
            .position(|a| a.start_point().fuzzy_cmp(&start) == Ordering::Greater)
            .unwrap_or(self.annotations.len());

        if !self.allow_overlaps {
            self.check_overlap(&ann, index)?;
        }

        self.annotations.insert(index, ann);
        Ok(index)
    }

    /// Remove and return the annotation at `index`.
    pub fn remove(&mut self, index: usize) -> Annotation {
        self.annotations.remove(index)
    }

    /// Reinsert an annotation at a known position without validation.
    ///
    /// Rollback path of the transactional transcription mutations: the
    /// annotation was at this position a moment ago, so the invariants
    /// hold by construction.
    pub(crate) fn insert_at(&mut self, index: usize, ann: Annotation) {
        self.annotations.insert(index, ann);
    }

    // ── Search ───────────────────────────────────────────────────────────

    /// Annotations overlapping (or exactly spanning) `[begin, end]`.
    ///
    /// With `overlaps` set, an annotation is returned when it shares time
    /// with the range: its end may touch `begin`, but an annotation merely
    /// starting at `end` is not included. Without `overlaps`, only
    /// annotations whose span fuzzy-equals the range are returned.
    ///
    /// Linear scan with early exit, relying on the sort invariant.
    #[must_use]
    pub fn find(&self, begin: f64, end: f64, overlaps: bool) -> Vec<&Annotation> {
        let b = TimePoint::new(begin);
        let e = TimePoint::new(end);
        let mut found = Vec::new();
        for ann in &self.annotations {
            let start = ann.start_point();
            if start.fuzzy_cmp(&e) != Ordering::Less {
                // sorted: nothing further can match
                break;
            }
            let stop = ann.end_point();
            if overlaps {
                if stop.fuzzy_cmp(&b) != Ordering::Less {
                    found.push(ann);
                }
            } else if start.fuzzy_eq(&b) && stop.fuzzy_eq(&e) {
                found.push(ann);
            }
        }
        found
    }

    /// Index of the annotation nearest to `point`.
    ///
    /// `direction` 1 returns the first annotation at-or-after the point,
    /// -1 the last annotation at-or-before it, and 0 whichever of the two
    /// is closer (the earlier one on a tie). Returns `None` when no
    /// annotation qualifies.
    #[must_use]
    pub fn near(&self, point: f64, direction: i32) -> Option<usize> {
        if self.annotations.is_empty() {
            return None;
        }
        let p = TimePoint::new(point);
        let after = self
            .annotations
            .iter()
            .position(|a| a.end_point().fuzzy_cmp(&p) != Ordering::Less);
        let before = self
            .annotations
            .iter()
            .rposition(|a| a.start_point().fuzzy_cmp(&p) != Ordering::Greater);

        match direction {
            1 => after,
            -1 => before,
            _ => match (before, after) {
                (Some(b), Some(a)) => {
                    if b == a {
                        return Some(b);
                    }
                    let db = (point - self.annotations[b].end_point().midpoint()).abs();
                    let da = (self.annotations[a].start_point().midpoint() - point).abs();
                    Some(if db <= da { b } else { a })
                }
                (Some(b), None) => Some(b),
                (None, a) => a,
            },
        }
    }

    /// Index of the first annotation whose span covers `point`.
    #[must_use]
    pub fn index_at(&self, point: f64) -> Option<usize> {
        let p = TimePoint::new(point);
        self.annotations.iter().position(|a| {
            a.start_point().fuzzy_cmp(&p) != Ordering::Greater
                && p.fuzzy_cmp(&a.end_point()) != Ordering::Greater
        })
    }

    /// Whether every annotation of `other` is contained in one of ours.
    ///
    /// This is the time-alignment coverage test: `self` is a superset of
    /// `other` when each localization of `other` fits (non-strictly)
    /// inside some localization of `self`.
    #[must_use]
    pub fn is_superset(&self, other: &Tier) -> bool {
        other.iter().all(|child| {
            self.iter()
                .any(|parent| parent.best_localization().contains(child.best_localization()))
        })
    }

    /// Annotations whose labels satisfy the predicates.
    ///
    /// The matched annotations land in an [`AnnSet`] keyed by their best
    /// text; an empty result is an [`AnnError::EmptyResult`].
    pub fn filter(
        &self,
        predicates: &[(TagPredicate, bool)],
        logic: MatchLogic,
    ) -> Result<AnnSet> {
        let mut set = AnnSet::new();
        for ann in &self.annotations {
            if ann.labels().iter().any(|l| l.matches(predicates, logic)) {
                set.append(ann.clone(), ann.text());
            }
        }
        if set.is_empty() {
            return Err(AnnError::EmptyResult("tier filter"));
        }
        Ok(set)
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn check_overlap(&self, ann: &Annotation, index: usize) -> Result<()> {
        let reject = || {
            Err(AnnError::AnnotationOverlap {
                tier: self.name.clone(),
                at: ann.start_point().midpoint(),
            })
        };
        if self.kind() == Some(LocalizationKind::Point) || ann.kind() == LocalizationKind::Point {
            // a duplicate point is the only possible point "overlap"
            if let Some(prev) = index.checked_sub(1).and_then(|i| self.annotations.get(i)) {
                if prev.start_point().fuzzy_eq(&ann.start_point()) {
                    return reject();
                }
            }
            if let Some(next) = self.annotations.get(index) {
                if next.start_point().fuzzy_eq(&ann.start_point()) {
                    return reject();
                }
            }
            return Ok(());
        }
        if let Some(prev) = index.checked_sub(1).and_then(|i| self.annotations.get(i)) {
            if prev.end_point().fuzzy_cmp(&ann.start_point()) == Ordering::Greater {
                return reject();
            }
        }
        if let Some(next) = self.annotations.get(index) {
            if ann.end_point().fuzzy_cmp(&next.start_point()) == Ordering::Greater {
                return reject();
            }
        }
        Ok(())
    }

    fn check_vocab(vocab: &CtrlVocab, ann: &Annotation) -> Result<()> {
        for label in ann.labels() {
            for (tag, _) in label.iter() {
                if !tag.is_empty() && !vocab.contains(tag) {
                    return Err(AnnError::VocabMismatch {
                        vocab: vocab.name().to_owned(),
                        content: tag.content(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
