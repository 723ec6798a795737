//! Capability vectors declared by the format adapters.

use serde::Serialize;

/// What a file format can represent.
///
/// Every adapter declares a fixed vector; callers query it before writing
/// to know whether a destination format supports the features of an
/// in-memory transcription (e.g. disjoint intervals, alternative tags) and
/// warn or degrade accordingly. This is what makes round-tripping safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// More than one tier per file.
    pub multi_tier: bool,
    /// A file with no tier at all is valid.
    pub no_tier: bool,
    /// Document-level metadata survives a round-trip.
    pub metadata: bool,
    /// Controlled vocabularies survive a round-trip.
    pub ctrl_vocab: bool,
    /// Media references survive a round-trip.
    pub media: bool,
    /// Hierarchy links survive a round-trip.
    pub hierarchy: bool,
    /// Point annotations.
    pub point: bool,
    /// Interval annotations.
    pub interval: bool,
    /// Disjoint-interval annotations.
    pub disjoint: bool,
    /// Alternative localizations with scores.
    pub alt_localization: bool,
    /// Alternative tags with scores.
    pub alt_tag: bool,
    /// Point radii (time uncertainty).
    pub radius: bool,
    /// Gaps between annotations.
    pub gaps: bool,
    /// Overlapping annotations.
    pub overlaps: bool,
}

impl Capabilities {
    /// The all-false vector adapters build their own constants from.
    pub const NONE: Self = Self {
        multi_tier: false,
        no_tier: false,
        metadata: false,
        ctrl_vocab: false,
        media: false,
        hierarchy: false,
        point: false,
        interval: false,
        disjoint: false,
        alt_localization: false,
        alt_tag: false,
        radius: false,
        gaps: false,
        overlaps: false,
    };

    /// The all-true vector; only the native format declares it.
    pub const FULL: Self = Self {
        multi_tier: true,
        no_tier: true,
        metadata: true,
        ctrl_vocab: true,
        media: true,
        hierarchy: true,
        point: true,
        interval: true,
        disjoint: true,
        alt_localization: true,
        alt_tag: true,
        radius: true,
        gaps: true,
        overlaps: true,
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_and_full_differ_everywhere() {
        assert!(!Capabilities::NONE.disjoint);
        assert!(Capabilities::FULL.disjoint);
        assert_ne!(Capabilities::NONE, Capabilities::FULL);
    }

    #[test]
    fn vectors_serialize_for_introspection() {
        let json = serde_json::to_string(&Capabilities::NONE).unwrap();
        assert!(json.contains("\"multi_tier\":false"));
    }
}
