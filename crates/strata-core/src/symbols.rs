//! Symbol tables classifying transcription conventions.
//!
//! Silences, pauses, laughter and noises are written with conventional
//! symbols in both orthographic and phonetic tiers ("#", "+", "@@", "sil",
//! "sp", ...). The table maps each symbol to its [`SymbolKind`]; tag
//! classification helpers consult it. A custom table can be deserialized
//! from JSON to override the compiled defaults.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// What a conventional transcription symbol stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// A silence.
    Silence,
    /// A short pause.
    Pause,
    /// A laughter item.
    Laugh,
    /// A noise item.
    Noise,
    /// A filler with no linguistic content.
    Dummy,
}

/// Map from conventional symbols to what they stand for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolTable {
    entries: BTreeMap<String, SymbolKind>,
}

static DEFAULT_TABLE: LazyLock<SymbolTable> = LazyLock::new(|| {
    let mut table = SymbolTable::default();
    // orthographic conventions
    table.insert("#", SymbolKind::Silence);
    table.insert("+", SymbolKind::Pause);
    table.insert("@@", SymbolKind::Laugh);
    table.insert("*", SymbolKind::Noise);
    // phonetic conventions
    table.insert("sil", SymbolKind::Silence);
    table.insert("sp", SymbolKind::Pause);
    table.insert("lg", SymbolKind::Laugh);
    table.insert("gb", SymbolKind::Noise);
    table.insert("dummy", SymbolKind::Dummy);
    table
});

impl SymbolTable {
    /// The compiled default table (orthographic + phonetic conventions).
    #[must_use]
    pub fn global() -> &'static SymbolTable {
        &DEFAULT_TABLE
    }

    /// Load a table from its JSON form: `{"symbol": "kind", ...}`.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Register a symbol.
    pub fn insert(&mut self, symbol: &str, kind: SymbolKind) {
        let _ = self.entries.insert(symbol.to_owned(), kind);
    }

    /// The kind of `symbol`, if it is a registered convention.
    #[must_use]
    pub fn kind_of(&self, symbol: &str) -> Option<SymbolKind> {
        self.entries.get(symbol).copied()
    }

    /// Every symbol of the given kind.
    #[must_use]
    pub fn symbols_of(&self, kind: SymbolKind) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(s, _)| s.as_str())
            .collect()
    }

    /// Number of registered symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_both_conventions() {
        let table = SymbolTable::global();
        assert_eq!(table.kind_of("#"), Some(SymbolKind::Silence));
        assert_eq!(table.kind_of("sil"), Some(SymbolKind::Silence));
        assert_eq!(table.kind_of("+"), Some(SymbolKind::Pause));
        assert_eq!(table.kind_of("sp"), Some(SymbolKind::Pause));
        assert_eq!(table.kind_of("@@"), Some(SymbolKind::Laugh));
        assert_eq!(table.kind_of("*"), Some(SymbolKind::Noise));
        assert_eq!(table.kind_of("dummy"), Some(SymbolKind::Dummy));
        assert_eq!(table.kind_of("hello"), None);
    }

    #[test]
    fn symbols_of_kind() {
        let silences = SymbolTable::global().symbols_of(SymbolKind::Silence);
        assert!(silences.contains(&"#"));
        assert!(silences.contains(&"sil"));
    }

    #[test]
    fn json_override() {
        let table = SymbolTable::from_json(r#"{"<sil>": "silence", "<p>": "pause"}"#).unwrap();
        assert_eq!(table.kind_of("<sil>"), Some(SymbolKind::Silence));
        assert_eq!(table.kind_of("<p>"), Some(SymbolKind::Pause));
        assert_eq!(table.kind_of("#"), None);
        assert_eq!(table.len(), 2);
    }
}
