//! One timed event: a location, its labels, and metadata.

use serde::Serialize;

use crate::label::Label;
use crate::localization::{Localization, LocalizationKind, Location, point::TimePoint};
use crate::metadata::Metadata;

/// A time-anchored annotation.
///
/// Identity is a generated unique id stored in the metadata and excluded
/// from equality: two annotations are equal iff their location and labels
/// match. Id generation happens exclusively at construction — it is never
/// derived from or synchronized with any external registry.
#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    meta: Metadata,
    location: Location,
    labels: Vec<Label>,
}

impl Annotation {
    /// An annotation with no label (e.g. a bare segmentation boundary).
    #[must_use]
    pub fn new(location: Location) -> Self {
        Self {
            meta: Metadata::new(),
            location,
            labels: Vec::new(),
        }
    }

    /// An annotation with labels.
    #[must_use]
    pub fn with_labels(location: Location, labels: Vec<Label>) -> Self {
        Self {
            meta: Metadata::new(),
            location,
            labels,
        }
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

    /// The location.
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Replace the location.
    ///
    /// This is the unchecked setter; when the owning tier participates in
    /// a hierarchy, go through `Transcription::set_annotation_location` so
    /// the link constraints are re-validated.
    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    /// The labels, in order. Labels of one annotation represent
    /// sequential sub-events cut from one time span.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Replace all labels.
    pub fn set_labels(&mut self, labels: Vec<Label>) {
        self.labels = labels;
    }

    /// Append one label.
    pub fn append_label(&mut self, label: Label) {
        self.labels.push(label);
    }

    /// Best tag of the first label, if any label exists.
    #[must_use]
    pub fn best_tag(&self) -> Option<&crate::label::tag::Tag> {
        self.labels.first().map(Label::best)
    }

    /// Space-joined best contents of all labels.
    #[must_use]
    pub fn text(&self) -> String {
        self.labels
            .iter()
            .map(|l| l.best().content())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Localization kind of the (best) location.
    #[must_use]
    pub fn kind(&self) -> LocalizationKind {
        self.location.kind()
    }

    /// Earliest point of the best localization.
    #[must_use]
    pub fn start_point(&self) -> TimePoint {
        self.location.best().start_point()
    }

    /// Latest point of the best localization.
    #[must_use]
    pub fn end_point(&self) -> TimePoint {
        self.location.best().end_point()
    }

    /// The best localization.
    #[must_use]
    pub fn best_localization(&self) -> &Localization {
        self.location.best()
    }

    /// Whether any label is non-empty.
    #[must_use]
    pub fn is_labelled(&self) -> bool {
        self.labels.iter().any(|l| !l.best().is_empty())
    }
}

impl PartialEq for Annotation {
    /// Location and labels only — id and other metadata are excluded.
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location && self.labels == other.labels
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::tag::Tag;
    use crate::localization::interval::TimeInterval;

    fn ann(b: f64, e: f64, text: &str) -> Annotation {
        Annotation::with_labels(
            Location::new(TimeInterval::from_bounds(b, e).unwrap()),
            vec![Label::new(Tag::string(text))],
        )
    }

    #[test]
    fn equality_ignores_id() {
        let a = ann(0.0, 1.0, "a");
        let b = ann(0.0, 1.0, "a");
        assert_ne!(a.id(), b.id());
        assert_eq!(a, b);
    }

    #[test]
    fn equality_ignores_other_metadata() {
        let a = ann(0.0, 1.0, "a");
        let mut b = ann(0.0, 1.0, "a");
        b.meta_mut().set("annotator", "someone");
        assert_eq!(a, b);
    }

    #[test]
    fn equality_covers_location_and_labels() {
        assert_ne!(ann(0.0, 1.0, "a"), ann(0.0, 2.0, "a"));
        assert_ne!(ann(0.0, 1.0, "a"), ann(0.0, 1.0, "b"));
    }

    #[test]
    fn text_joins_label_bests() {
        let mut a = ann(0.0, 1.0, "hello");
        a.append_label(Label::new(Tag::string("world")));
        assert_eq!(a.text(), "hello world");
    }

    #[test]
    fn span_accessors() {
        let a = ann(1.0, 2.0, "x");
        assert_eq!(a.start_point().midpoint(), 1.0);
        assert_eq!(a.end_point().midpoint(), 2.0);
        assert_eq!(a.kind(), LocalizationKind::Interval);
    }

    #[test]
    fn unlabelled_annotation() {
        let a = Annotation::new(Location::new(TimeInterval::from_bounds(0.0, 1.0).unwrap()));
        assert!(!a.is_labelled());
        assert_eq!(a.best_tag(), None);
        assert_eq!(a.text(), "");
    }
}
