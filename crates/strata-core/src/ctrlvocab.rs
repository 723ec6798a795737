//! Controlled vocabularies: the set of tags a tier may legally carry.

use serde::Serialize;

use crate::errors::{AnnError, Result};
use crate::label::tag::{normalize_text, Tag};
use crate::metadata::Metadata;

/// A restricted set of legal tags, all of one type, with optional
/// per-entry descriptions.
///
/// The vocabulary name is normalized: whitespace runs become single
/// underscores, so it is safe as an identifier in serialized files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CtrlVocab {
    meta: Metadata,
    name: String,
    description: String,
    entries: Vec<(Tag, String)>,
}

fn normalize_name(name: &str) -> String {
    normalize_text(name).replace(' ', "_")
}

impl CtrlVocab {
    /// An empty vocabulary.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            meta: Metadata::new(),
            name: normalize_name(name),
            description: String::new(),
            entries: Vec::new(),
        }
    }

    /// The normalized name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename; the new name is normalized too.
    pub fn set_name(&mut self, name: &str) {
        self.name = normalize_name(name);
    }

    /// The vocabulary description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Set the vocabulary description.
    pub fn set_description(&mut self, description: &str) {
        self.description = normalize_text(description);
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

    /// Add an entry. Returns `false` when the tag is already present.
    ///
    /// All entries of a vocabulary share one tag type; a mismatch is a
    /// typed error.
    pub fn add(&mut self, tag: Tag) -> Result<bool> {
        self.add_with_description(tag, "")
    }

    /// Add an entry with a description.
    pub fn add_with_description(&mut self, tag: Tag, description: &str) -> Result<bool> {
        self.check_type(&tag)?;
        if self.contains(&tag) {
            return Ok(false);
        }
        self.entries.push((tag, normalize_text(description)));
        Ok(true)
    }

    /// Remove an entry. Returns `false` when the tag was not present.
    pub fn remove(&mut self, tag: &Tag) -> Result<bool> {
        self.check_type(tag)?;
        let before = self.entries.len();
        self.entries.retain(|(t, _)| t != tag);
        Ok(self.entries.len() < before)
    }

    /// Whether the tag is an entry (typed equality).
    #[must_use]
    pub fn contains(&self, tag: &Tag) -> bool {
        if let Some((first, _)) = self.entries.first() {
            if first.type_name() != tag.type_name() {
                return false;
            }
        }
        self.entries.iter().any(|(t, _)| t == tag)
    }

    /// Description attached to an entry.
    #[must_use]
    pub fn description_of(&self, tag: &Tag) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, d)| d.as_str())
    }

    /// Entries with their descriptions, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Tag, &str)> {
        self.entries.iter().map(|(t, d)| (t, d.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the vocabulary has no entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_type(&self, tag: &Tag) -> Result<()> {
        if let Some((first, _)) = self.entries.first() {
            if first.type_name() != tag.type_name() {
                return Err(AnnError::Type {
                    value: tag.content(),
                    expected: first.type_name(),
                });
            }
        }
        Ok(())
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
    fn name_is_normalized() {
        let voc = CtrlVocab::new("être être");
        assert_eq!(voc.name(), "être_être");
        let voc = CtrlVocab::new("  Verbal \t Strategies ");
        assert_eq!(voc.name(), "Verbal_Strategies");
    }

    #[test]
    fn add_and_duplicates() {
        let mut voc = CtrlVocab::new("Verbal Strategies");
        assert_eq!(voc.len(), 0);
        assert!(voc.add(Tag::string("definition")).unwrap());
        assert!(voc.add(Tag::string("example")).unwrap());
        assert!(voc.add(Tag::string("comparison")).unwrap());
        assert!(voc.add(Tag::string("gap filling with sound")).unwrap());
        assert!(!voc.add(Tag::string("definition")).unwrap());
        assert_eq!(voc.len(), 4);
        // content is normalized before comparison
        assert!(!voc.add(Tag::string(" gap filling with sound ")).unwrap());
    }

    #[test]
    fn typed_entries_reject_other_types() {
        let mut voc = CtrlVocab::new("Intensity");
        assert!(voc.add(Tag::integer(1)).unwrap());
        assert!(voc.add(Tag::integer(2)).unwrap());
        assert!(!voc.add(Tag::integer(1)).unwrap());
        // "1" as a string is not an int entry
        assert_matches!(voc.add(Tag::string("1")), Err(AnnError::Type { .. }));
    }

    #[test]
    fn contains_is_typed() {
        let mut voc = CtrlVocab::new("Intensity");
        voc.add(Tag::integer(1)).unwrap();
        voc.add(Tag::integer(2)).unwrap();
        assert!(voc.contains(&Tag::integer(2)));
        assert!(!voc.contains(&Tag::string("2")));
    }

    #[test]
    fn contains_normalizes_whitespace() {
        let mut voc = CtrlVocab::new("v");
        voc.add(Tag::string("definition")).unwrap();
        assert!(voc.contains(&Tag::string("   \t  definition\r\n")));
    }

    #[test]
    fn remove() {
        let mut voc = CtrlVocab::new("v");
        voc.add(Tag::string("definition")).unwrap();
        voc.add(Tag::string("example")).unwrap();
        assert!(voc.remove(&Tag::string("example")).unwrap());
        assert!(!voc.remove(&Tag::string("example")).unwrap());
        assert_eq!(voc.len(), 1);
    }

    #[test]
    fn entry_descriptions() {
        let mut voc = CtrlVocab::new("v");
        voc.add_with_description(Tag::string("def"), "a definition")
            .unwrap();
        assert_eq!(voc.description_of(&Tag::string("def")), Some("a definition"));
        assert_eq!(voc.description_of(&Tag::string("nope")), None);
    }
}
