//! Hierarchy of tiers: time-coverage constraints between tier pairs.
//!
//! The hierarchy is a graph owned by the transcription, mapping each child
//! tier to its parent with a link type:
//!
//! - **TimeAlignment** — every child annotation is (non-strictly) contained
//!   in some parent annotation: the child refines the parent's segmentation.
//! - **TimeAssociation** — both tiers carry the same number of annotations
//!   with pairwise fuzzy-corresponding spans.
//!
//! Links are keyed by tier *id*, not name, so renaming a tier never breaks
//! the graph. Validation helpers operate on borrowed tiers; the constraint
//! is enforced by the transcription on every mutation of either side.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{AnnError, HierarchyError, Result};
use crate::tier::Tier;

// ─────────────────────────────────────────────────────────────────────────────
// LinkType
// ─────────────────────────────────────────────────────────────────────────────

/// The constraint a hierarchy link enforces between parent and child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkType {
    /// Child annotations are contained in parent annotations.
    TimeAlignment,
    /// Annotations correspond one-to-one in time.
    TimeAssociation,
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeAlignment => write!(f, "TimeAlignment"),
            Self::TimeAssociation => write!(f, "TimeAssociation"),
        }
    }
}

impl FromStr for LinkType {
    type Err = AnnError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "TimeAlignment" => Ok(Self::TimeAlignment),
            "TimeAssociation" => Ok(Self::TimeAssociation),
            other => Err(AnnError::Type {
                value: other.to_owned(),
                expected: "TimeAlignment or TimeAssociation",
            }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hierarchy graph
// ─────────────────────────────────────────────────────────────────────────────

/// One parent/child link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyLink {
    /// Id of the parent tier.
    pub parent_id: String,
    /// Id of the child tier.
    pub child_id: String,
    /// The enforced constraint.
    pub link_type: LinkType,
}

/// The hierarchy graph: each child tier has at most one parent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Hierarchy {
    links: Vec<HierarchyLink>,
}

impl Hierarchy {
    /// An empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a link. Performs the graph checks only — the time
    /// constraint between the two tiers is validated by the caller first.
    pub fn add(&mut self, parent_id: &str, child_id: &str, link_type: LinkType) -> Result<()> {
        if parent_id == child_id {
            return Err(HierarchyError::SelfLink.into());
        }
        if self.parent_of(child_id).is_some() {
            return Err(HierarchyError::AlreadyLinked(child_id.to_owned()).into());
        }
        // walk up from the parent; reaching the child closes a cycle
        let mut current = parent_id;
        while let Some((ancestor, _)) = self.parent_of(current) {
            if ancestor == child_id {
                return Err(HierarchyError::CycleDetected {
                    parent: parent_id.to_owned(),
                    child: child_id.to_owned(),
                }
                .into());
            }
            current = ancestor;
        }
        self.links.push(HierarchyLink {
            parent_id: parent_id.to_owned(),
            child_id: child_id.to_owned(),
            link_type,
        });
        Ok(())
    }

    /// The parent of a child tier, if linked.
    #[must_use]
    pub fn parent_of(&self, child_id: &str) -> Option<(&str, LinkType)> {
        self.links
            .iter()
            .find(|l| l.child_id == child_id)
            .map(|l| (l.parent_id.as_str(), l.link_type))
    }

    /// The children of a parent tier.
    #[must_use]
    pub fn children_of(&self, parent_id: &str) -> Vec<(&str, LinkType)> {
        self.links
            .iter()
            .filter(|l| l.parent_id == parent_id)
            .map(|l| (l.child_id.as_str(), l.link_type))
            .collect()
    }

    /// Drop the parent link of a child. Returns `true` when one existed.
    pub fn remove_child(&mut self, child_id: &str) -> bool {
        let before = self.links.len();
        self.links.retain(|l| l.child_id != child_id);
        self.links.len() < before
    }

    /// Drop every link touching a tier (used when the tier is removed).
    pub fn remove_tier(&mut self, tier_id: &str) {
        self.links
            .retain(|l| l.parent_id != tier_id && l.child_id != tier_id);
    }

    /// All links.
    #[must_use]
    pub fn links(&self) -> &[HierarchyLink] {
        &self.links
    }

    /// Number of links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the hierarchy has no link.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Constraint validation
// ─────────────────────────────────────────────────────────────────────────────

/// Full-coverage check for a link of the given type.
pub fn validate_link(link_type: LinkType, parent: &Tier, child: &Tier) -> Result<()> {
    match link_type {
        LinkType::TimeAlignment => validate_time_alignment(parent, child),
        LinkType::TimeAssociation => validate_time_association(parent, child),
    }
}

/// Every child annotation must be non-strictly contained in some parent
/// annotation.
pub fn validate_time_alignment(parent: &Tier, child: &Tier) -> Result<()> {
    for ann in child.iter() {
        let contained = parent
            .iter()
            .any(|p| p.best_localization().contains(ann.best_localization()));
        if !contained {
            return Err(HierarchyError::AlignmentViolation {
                parent: parent.name().to_owned(),
                child: child.name().to_owned(),
                begin: ann.start_point().midpoint(),
                end: ann.end_point().midpoint(),
            }
            .into());
        }
    }
    Ok(())
}

/// Both tiers must hold the same number of annotations with pairwise
/// fuzzy-equal spans.
pub fn validate_time_association(parent: &Tier, child: &Tier) -> Result<()> {
    if parent.len() != child.len() {
        return Err(HierarchyError::AssociationViolation {
            parent: parent.name().to_owned(),
            child: child.name().to_owned(),
            detail: format!(
                "annotation counts differ ({} vs {})",
                parent.len(),
                child.len()
            ),
        }
        .into());
    }
    for (p, c) in parent.iter().zip(child.iter()) {
        if !p.start_point().fuzzy_eq(&c.start_point()) || !p.end_point().fuzzy_eq(&c.end_point()) {
            return Err(HierarchyError::AssociationViolation {
                parent: parent.name().to_owned(),
                child: child.name().to_owned(),
                detail: format!(
                    "spans [{}, {}] and [{}, {}] do not correspond",
                    p.start_point().midpoint(),
                    p.end_point().midpoint(),
                    c.start_point().midpoint(),
                    c.end_point().midpoint()
                ),
            }
            .into());
        }
    }
    Ok(())
}

/// Targeted alignment re-check, restricted to `[begin, end]`.
///
/// After an edit, only annotations overlapping the affected range need
/// re-validation: the check is O(affected-region), not O(n).
pub fn validate_alignment_range(parent: &Tier, child: &Tier, begin: f64, end: f64) -> Result<()> {
    let parents = parent.find(begin, end, true);
    for ann in child.find(begin, end, true) {
        let contained = parents
            .iter()
            .any(|p| p.best_localization().contains(ann.best_localization()));
        if !contained {
            return Err(HierarchyError::AlignmentViolation {
                parent: parent.name().to_owned(),
                child: child.name().to_owned(),
                begin: ann.start_point().midpoint(),
                end: ann.end_point().midpoint(),
            }
            .into());
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::interval::TimeInterval;
    use crate::localization::Location;
    use assert_matches::assert_matches;

    fn tier(name: &str, spans: &[(f64, f64)]) -> Tier {
        let mut t = Tier::new(name);
        for (b, e) in spans {
            let _ = t
                .create_annotation(
                    Location::new(TimeInterval::from_bounds(*b, *e).unwrap()),
                    vec![],
                )
                .unwrap();
        }
        t
    }

    #[test]
    fn link_type_parse_and_display() {
        assert_eq!(
            "TimeAlignment".parse::<LinkType>().unwrap(),
            LinkType::TimeAlignment
        );
        assert_eq!(LinkType::TimeAssociation.to_string(), "TimeAssociation");
        assert_matches!("Toto".parse::<LinkType>(), Err(AnnError::Type { .. }));
    }

    #[test]
    fn self_link_rejected() {
        let mut h = Hierarchy::new();
        assert_matches!(
            h.add("t1", "t1", LinkType::TimeAlignment),
            Err(AnnError::Hierarchy(HierarchyError::SelfLink))
        );
    }

    #[test]
    fn single_parent_per_child() {
        let mut h = Hierarchy::new();
        h.add("t1", "t2", LinkType::TimeAlignment).unwrap();
        assert_matches!(
            h.add("t3", "t2", LinkType::TimeAlignment),
            Err(AnnError::Hierarchy(HierarchyError::AlreadyLinked(_)))
        );
    }

    #[test]
    fn cycle_rejected() {
        let mut h = Hierarchy::new();
        h.add("t1", "t2", LinkType::TimeAlignment).unwrap();
        h.add("t2", "t3", LinkType::TimeAlignment).unwrap();
        assert_matches!(
            h.add("t3", "t1", LinkType::TimeAlignment),
            Err(AnnError::Hierarchy(HierarchyError::CycleDetected { .. }))
        );
    }

    #[test]
    fn parent_and_children_lookup() {
        let mut h = Hierarchy::new();
        h.add("t1", "t2", LinkType::TimeAlignment).unwrap();
        h.add("t1", "t3", LinkType::TimeAssociation).unwrap();
        assert_eq!(h.parent_of("t2"), Some(("t1", LinkType::TimeAlignment)));
        assert_eq!(h.parent_of("t1"), None);
        assert_eq!(h.children_of("t1").len(), 2);
    }

    #[test]
    fn remove_tier_drops_dangling_links() {
        let mut h = Hierarchy::new();
        h.add("t1", "t2", LinkType::TimeAlignment).unwrap();
        h.add("t2", "t3", LinkType::TimeAlignment).unwrap();
        h.remove_tier("t2");
        assert!(h.is_empty());
    }

    #[test]
    fn alignment_accepts_refinement() {
        let parent = tier("p", &[(0.0, 1.0), (1.0, 2.0)]);
        let child = tier("c", &[(0.0, 0.5), (0.5, 1.0), (1.0, 2.0)]);
        // each child interval fits inside one parent interval
        assert!(validate_time_alignment(&parent, &child).is_ok());
    }

    #[test]
    fn alignment_rejects_uncovered_child() {
        let parent = tier("p", &[(0.0, 1.0), (1.0, 2.0)]);
        let child = tier("c", &[(0.0, 2.1)]);
        assert_matches!(
            validate_time_alignment(&parent, &child),
            Err(AnnError::Hierarchy(HierarchyError::AlignmentViolation { .. }))
        );
    }

    #[test]
    fn alignment_child_spanning_two_parents_rejected() {
        let parent = tier("p", &[(0.0, 1.0), (1.0, 2.0)]);
        let child = tier("c", &[(0.5, 1.5)]);
        assert_matches!(
            validate_time_alignment(&parent, &child),
            Err(AnnError::Hierarchy(HierarchyError::AlignmentViolation { .. }))
        );
    }

    #[test]
    fn association_requires_equal_counts() {
        let parent = tier("p", &[(0.0, 1.0), (1.0, 2.0)]);
        let child = tier("c", &[(0.0, 1.0)]);
        assert_matches!(
            validate_time_association(&parent, &child),
            Err(AnnError::Hierarchy(HierarchyError::AssociationViolation { .. }))
        );
    }

    #[test]
    fn association_requires_corresponding_spans() {
        let parent = tier("p", &[(0.0, 1.0), (1.0, 2.0)]);
        let good = tier("c", &[(0.0, 1.0), (1.0, 2.0)]);
        assert!(validate_time_association(&parent, &good).is_ok());
        let bad = tier("c", &[(0.0, 1.0), (1.0, 3.0)]);
        assert_matches!(
            validate_time_association(&parent, &bad),
            Err(AnnError::Hierarchy(HierarchyError::AssociationViolation { .. }))
        );
    }

    #[test]
    fn range_check_only_sees_affected_region() {
        let parent = tier("p", &[(0.0, 1.0), (1.0, 2.0)]);
        // child has an uncovered annotation far away from the probed range
        let child = tier("c", &[(0.0, 0.5), (5.0, 6.0)]);
        assert!(validate_alignment_range(&parent, &child, 0.0, 1.0).is_ok());
        assert_matches!(
            validate_alignment_range(&parent, &child, 5.0, 6.5),
            Err(AnnError::Hierarchy(HierarchyError::AlignmentViolation { .. }))
        );
    }
}
