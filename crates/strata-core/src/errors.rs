//! Error hierarchy for the annotation data model.
//!
//! Provides a structured error type system built on [`thiserror`]:
//!
//! - [`AnnError`]: Top-level enum covering all data-model error domains
//! - [`HierarchyError`]: Violations of tier hierarchy constraints
//!
//! Validation errors are raised immediately at the point of violation and
//! propagate uncaught to the caller — the data-model layer never swallows
//! structural errors.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, AnnError>;

// ─────────────────────────────────────────────────────────────────────────────
// AnnError — top-level error enum
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level error type for the annotation data model.
#[derive(Debug, Error)]
pub enum AnnError {
    /// Content cannot be coerced to the declared or expected type.
    #[error("expected {expected}, got '{value}'")]
    Type {
        /// The offending value, rendered as text.
        value: String,
        /// What the operation expected.
        expected: &'static str,
    },

    /// A tag type name outside the supported set.
    #[error("unknown tag type '{0}'")]
    UnknownTagType(String),

    /// A negative value where only non-negative is valid.
    #[error("negative value {0} where a non-negative value is required")]
    NegativeValue(f64),

    /// Interval constructed with `end <= begin` (fuzzy ordering).
    #[error("interval end ({end}) must be strictly after begin ({begin})")]
    IntervalBounds {
        /// Begin midpoint.
        begin: f64,
        /// End midpoint.
        end: f64,
    },

    /// A disjoint localization with no interval at all.
    #[error("a disjoint localization requires at least one interval")]
    DisjointEmpty,

    /// Two intervals of one disjoint localization overlap.
    #[error("disjoint intervals overlap around {0}")]
    DisjointOverlap(f64),

    /// An annotation whose localization kind differs from the tier's.
    #[error("tier '{tier}' holds {expected} annotations, got {found}")]
    TierTypeMismatch {
        /// Tier name.
        tier: String,
        /// Localization kind of the tier.
        expected: &'static str,
        /// Localization kind of the rejected annotation.
        found: &'static str,
    },

    /// An annotation overlapping an existing one on a tier that forbids it.
    #[error("annotation at {at} overlaps an existing annotation of tier '{tier}'")]
    AnnotationOverlap {
        /// Tier name.
        tier: String,
        /// Start midpoint of the rejected annotation.
        at: f64,
    },

    /// A tag outside the tier's controlled vocabulary.
    #[error("tag '{content}' is not an entry of the controlled vocabulary '{vocab}'")]
    VocabMismatch {
        /// Vocabulary name.
        vocab: String,
        /// Rejected tag content.
        content: String,
    },

    /// Two tiers with the same (normalized) name in one transcription.
    #[error("a tier named '{0}' already exists")]
    DuplicateTier(String),

    /// Tier lookup by name failed.
    #[error("no tier named '{0}'")]
    NoSuchTier(String),

    /// The `id` metadata entry cannot be removed.
    #[error("the 'id' metadata entry cannot be removed")]
    ProtectedMeta,

    /// A hierarchy link constraint was violated.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    /// An operation (tier filter, search) produced nothing actionable.
    #[error("{0} produced no result")]
    EmptyResult(&'static str),
}

// ─────────────────────────────────────────────────────────────────────────────
// HierarchyError
// ─────────────────────────────────────────────────────────────────────────────

/// Violation of a tier hierarchy constraint.
#[derive(Debug, Error)]
pub enum HierarchyError {
    /// A tier linked to itself.
    #[error("a tier cannot be linked to itself")]
    SelfLink,

    /// The child tier already has a parent link.
    #[error("tier '{0}' already has a parent in the hierarchy")]
    AlreadyLinked(String),

    /// The new link would close a parent/child cycle.
    #[error("linking '{child}' under '{parent}' would create a cycle")]
    CycleDetected {
        /// Parent tier name.
        parent: String,
        /// Child tier name.
        child: String,
    },

    /// Time-alignment: a child annotation not contained in any parent one.
    #[error(
        "alignment violation: annotation of '{child}' at [{begin}, {end}] \
         is not contained in any annotation of '{parent}'"
    )]
    AlignmentViolation {
        /// Parent tier name.
        parent: String,
        /// Child tier name.
        child: String,
        /// Begin midpoint of the offending annotation.
        begin: f64,
        /// End midpoint of the offending annotation.
        end: f64,
    },

    /// Time-association: counts or pairwise spans do not correspond.
    #[error("association violation between '{parent}' and '{child}': {detail}")]
    AssociationViolation {
        /// Parent tier name.
        parent: String,
        /// Child tier name.
        child: String,
        /// What failed to correspond.
        detail: String,
    },

    /// A link references a tier the transcription does not contain.
    #[error("tier '{0}' does not belong to this transcription")]
    TierNotInTranscription(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_error_display() {
        let err = AnnError::Type {
            value: "abc".to_owned(),
            expected: "int",
        };
        assert_eq!(err.to_string(), "expected int, got 'abc'");
    }

    #[test]
    fn interval_bounds_display() {
        let err = AnnError::IntervalBounds {
            begin: 2.0,
            end: 1.0,
        };
        assert!(err.to_string().contains("must be strictly after"));
    }

    #[test]
    fn hierarchy_error_wraps_transparently() {
        let err = AnnError::from(HierarchyError::SelfLink);
        assert_eq!(err.to_string(), "a tier cannot be linked to itself");
    }

    #[test]
    fn alignment_violation_names_both_tiers() {
        let err = HierarchyError::AlignmentViolation {
            parent: "Tokens".to_owned(),
            child: "Phones".to_owned(),
            begin: 1.0,
            end: 2.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("Tokens"));
        assert!(msg.contains("Phones"));
        assert!(msg.contains("[1, 2.5]"));
    }

    #[test]
    fn errors_are_std_error() {
        let err = AnnError::DuplicateTier("Tokens".to_owned());
        let _: &dyn std::error::Error = &err;
        let err = HierarchyError::SelfLink;
        let _: &dyn std::error::Error = &err;
    }
}
