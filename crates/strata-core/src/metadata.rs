//! Ordered key/value metadata with a generated identifier.
//!
//! Every model object (annotation, tier, media, vocabulary, transcription)
//! carries a [`Metadata`] store. The store always holds an `id` entry,
//! generated as a UUID at construction and protected from removal. Insertion
//! order is preserved so that serialized files list entries the way the
//! author wrote them.

use serde::Serialize;

use crate::errors::{AnnError, Result};

/// Key of the protected identifier entry.
pub const ID_KEY: &str = "id";

/// Insertion-ordered metadata store with a required `id` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    /// Entries in insertion order; `id` is always first.
    entries: Vec<(String, String)>,
}

impl Metadata {
    /// Create a store holding a freshly generated `id`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: vec![(ID_KEY.to_owned(), uuid::Uuid::new_v4().to_string())],
        }
    }

    /// The identifier of the owning object.
    #[must_use]
    pub fn id(&self) -> &str {
        self.get(ID_KEY).unwrap_or_default()
    }

    /// Replace the identifier with a freshly generated one.
    pub fn regen_id(&mut self) {
        self.set(ID_KEY, uuid::Uuid::new_v4().to_string());
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Value of `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value of `key`, or `default` when absent.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Set or update an entry. Keys and values are whitespace-normalized.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let key = crate::label::tag::normalize_text(key);
        let value = crate::label::tag::normalize_text(&value.into());
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Remove an entry. Removing `id` is an error.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        if key == ID_KEY {
            return Err(AnnError::ProtectedMeta);
        }
        self.entries.retain(|(k, _)| k != key);
        Ok(())
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of entries, `id` included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether only the `id` entry is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Copy every entry of `other` except its `id` into self.
    pub fn absorb(&mut self, other: &Metadata) {
        for (k, v) in other.iter() {
            if k != ID_KEY {
                self.set(k, v);
            }
        }
    }

    // ── Default metadata helpers ─────────────────────────────────────────

    /// Record the producing software.
    pub fn add_software_metadata(&mut self, name: &str, version: &str) {
        self.set("software_name", name);
        self.set("software_version", version);
    }

    /// Record the license applied to the annotated content.
    pub fn add_license_metadata(&mut self, text: &str, url: &str) {
        self.set("file_license_text", text);
        self.set("file_license_url", url);
    }

    /// Record who annotated the content.
    pub fn add_annotator_metadata(&mut self, name: &str) {
        self.set("annotator_name", name);
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
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
    fn new_has_generated_id() {
        let meta = Metadata::new();
        assert!(!meta.id().is_empty());
        assert!(meta.contains_key(ID_KEY));
        assert!(meta.is_empty());
        assert_eq!(meta.len(), 1);
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Metadata::new().id(), Metadata::new().id());
    }

    #[test]
    fn set_get_roundtrip() {
        let mut meta = Metadata::new();
        meta.set("created", "2015-08-03");
        assert_eq!(meta.get("created"), Some("2015-08-03"));
        assert_eq!(meta.get_or("missing", "d"), "d");
    }

    #[test]
    fn set_normalizes_whitespace() {
        let mut meta = Metadata::new();
        meta.set("  key \t ", "  a \n b  ");
        assert_eq!(meta.get("key"), Some("a b"));
    }

    #[test]
    fn set_overwrites_in_place() {
        let mut meta = Metadata::new();
        meta.set("a", "1");
        meta.set("b", "2");
        meta.set("a", "3");
        let keys: Vec<&str> = meta.keys().collect();
        assert_eq!(keys, vec![ID_KEY, "a", "b"]);
        assert_eq!(meta.get("a"), Some("3"));
    }

    #[test]
    fn remove_id_is_rejected() {
        let mut meta = Metadata::new();
        assert_matches!(meta.remove(ID_KEY), Err(AnnError::ProtectedMeta));
        assert!(meta.contains_key(ID_KEY));
    }

    #[test]
    fn remove_other_key() {
        let mut meta = Metadata::new();
        meta.set("a", "1");
        meta.remove("a").unwrap();
        assert!(!meta.contains_key("a"));
    }

    #[test]
    fn absorb_skips_id() {
        let mut a = Metadata::new();
        let mut b = Metadata::new();
        b.set("k", "v");
        let id_before = a.id().to_owned();
        a.absorb(&b);
        assert_eq!(a.id(), id_before);
        assert_eq!(a.get("k"), Some("v"));
    }

    #[test]
    fn regen_id_changes_value() {
        let mut meta = Metadata::new();
        let before = meta.id().to_owned();
        meta.regen_id();
        assert_ne!(meta.id(), before);
    }
}
