//! Typed tag content.
//!
//! A [`Tag`] is one possible content of a label: a string, an integer, a
//! float, a boolean, a fuzzy point, or a fuzzy rect. The type is fixed at
//! construction as a tagged union — no re-parsing happens after that — and
//! the canonical string form round-trips through the serialized formats.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{AnnError, Result};
use crate::label::fuzzy::{FuzzyPoint, FuzzyRect};
use crate::symbols::{SymbolKind, SymbolTable};

/// Collapse whitespace runs into single spaces and trim the ends.
#[must_use]
pub fn normalize_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The typed content of a [`Tag`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagContent {
    /// Whitespace-normalized text.
    Str(String),
    /// A signed integer.
    Int(i64),
    /// A float.
    Float(f64),
    /// A boolean.
    Bool(bool),
    /// A fuzzy image point.
    Point(FuzzyPoint),
    /// A fuzzy image rect.
    Rect(FuzzyRect),
}

/// One of the possible tags of a label.
///
/// Equality compares typed content; for point/rect content this inherits
/// the area-overlap fuzziness of [`FuzzyPoint`] / [`FuzzyRect`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    content: TagContent,
}

impl Tag {
    /// The supported type names, as written in serialized files.
    pub const TYPE_NAMES: [&'static str; 6] = ["str", "int", "float", "bool", "point", "rect"];

    /// A text tag; content is whitespace-normalized.
    #[must_use]
    pub fn string(content: &str) -> Self {
        Self {
            content: TagContent::Str(normalize_text(content)),
        }
    }

    /// An integer tag.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self {
            content: TagContent::Int(value),
        }
    }

    /// A float tag.
    #[must_use]
    pub fn float(value: f64) -> Self {
        Self {
            content: TagContent::Float(value),
        }
    }

    /// A boolean tag.
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self {
            content: TagContent::Bool(value),
        }
    }

    /// A fuzzy-point tag.
    #[must_use]
    pub fn point(value: FuzzyPoint) -> Self {
        Self {
            content: TagContent::Point(value),
        }
    }

    /// A fuzzy-rect tag.
    #[must_use]
    pub fn rect(value: FuzzyRect) -> Self {
        Self {
            content: TagContent::Rect(value),
        }
    }

    /// Parse `content` into a tag of the named type.
    ///
    /// This is the boundary constructor used by the file formats: the
    /// content is validated once here and stored typed. An unknown
    /// `type_name` is an [`AnnError::UnknownTagType`]; content that cannot
    /// be coerced is an [`AnnError::Type`] — "abc" declared as "int" fails
    /// instead of silently becoming zero.
    pub fn from_typed_str(content: &str, type_name: &str) -> Result<Self> {
        match type_name {
            "str" => Ok(Self::string(content)),
            "int" => content
                .trim()
                .parse::<i64>()
                .map(Self::integer)
                .map_err(|_| AnnError::Type {
                    value: content.to_owned(),
                    expected: "int",
                }),
            "float" => content
                .trim()
                .parse::<f64>()
                .map(Self::float)
                .map_err(|_| AnnError::Type {
                    value: content.to_owned(),
                    expected: "float",
                }),
            // any content that is not literally true is false
            "bool" => Ok(Self::boolean(content.trim().eq_ignore_ascii_case("true"))),
            "point" => content.parse::<FuzzyPoint>().map(Self::point),
            "rect" => content.parse::<FuzzyRect>().map(Self::rect),
            other => Err(AnnError::UnknownTagType(other.to_owned())),
        }
    }

    /// The typed content.
    #[must_use]
    pub fn typed(&self) -> &TagContent {
        &self.content
    }

    /// The type name, as written in serialized files.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self.content {
            TagContent::Str(_) => "str",
            TagContent::Int(_) => "int",
            TagContent::Float(_) => "float",
            TagContent::Bool(_) => "bool",
            TagContent::Point(_) => "point",
            TagContent::Rect(_) => "rect",
        }
    }

    /// The canonical string form; this is what the file formats store.
    #[must_use]
    pub fn content(&self) -> String {
        match &self.content {
            TagContent::Str(s) => s.clone(),
            TagContent::Int(i) => i.to_string(),
            TagContent::Float(f) => f.to_string(),
            TagContent::Bool(b) => b.to_string(),
            TagContent::Point(p) => p.to_string(),
            TagContent::Rect(r) => r.to_string(),
        }
    }

    /// Integer value, when the tag holds one.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self.content {
            TagContent::Int(i) => Some(i),
            _ => None,
        }
    }

    /// Float value, when the tag holds one.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self.content {
            TagContent::Float(f) => Some(f),
            _ => None,
        }
    }

    /// Boolean value, when the tag holds one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.content {
            TagContent::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Text value, when the tag holds one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.content {
            TagContent::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Fuzzy point, when the tag holds one.
    #[must_use]
    pub fn as_point(&self) -> Option<&FuzzyPoint> {
        match &self.content {
            TagContent::Point(p) => Some(p),
            _ => None,
        }
    }

    /// Fuzzy rect, when the tag holds one.
    #[must_use]
    pub fn as_rect(&self) -> Option<&FuzzyRect> {
        match &self.content {
            TagContent::Rect(r) => Some(r),
            _ => None,
        }
    }

    /// Whether the tag is empty text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(&self.content, TagContent::Str(s) if s.is_empty())
    }

    // ── Transcription-convention classification ─────────────────────────

    /// Whether the tag is a silence symbol of `table`.
    #[must_use]
    pub fn is_silence_in(&self, table: &SymbolTable) -> bool {
        match self.as_str() {
            // "gpf_" prefixed silences occur in legacy French corpora
            Some(s) => table.kind_of(s) == Some(SymbolKind::Silence) || s.starts_with("gpf_"),
            None => false,
        }
    }

    /// Whether the tag is a silence symbol of the default table.
    #[must_use]
    pub fn is_silence(&self) -> bool {
        self.is_silence_in(SymbolTable::global())
    }

    /// Whether the tag is a short-pause symbol.
    #[must_use]
    pub fn is_pause(&self) -> bool {
        self.kind() == Some(SymbolKind::Pause)
    }

    /// Whether the tag is a laughter symbol.
    #[must_use]
    pub fn is_laugh(&self) -> bool {
        self.kind() == Some(SymbolKind::Laugh)
    }

    /// Whether the tag is a noise symbol.
    #[must_use]
    pub fn is_noise(&self) -> bool {
        self.kind() == Some(SymbolKind::Noise)
    }

    /// Whether the tag is the dummy filler.
    #[must_use]
    pub fn is_dummy(&self) -> bool {
        self.kind() == Some(SymbolKind::Dummy)
    }

    /// Whether the tag carries actual speech: none of the conventional
    /// silence/pause/laugh/noise/dummy symbols.
    #[must_use]
    pub fn is_speech(&self) -> bool {
        !(self.is_silence() || self.is_pause() || self.is_laugh() || self.is_noise() || self.is_dummy())
    }

    fn kind(&self) -> Option<SymbolKind> {
        self.as_str().and_then(|s| SymbolTable::global().kind_of(s))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.content(), self.type_name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
