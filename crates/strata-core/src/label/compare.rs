//! Tag comparison predicates, used by the tier filter system.

use regex::Regex;

use crate::errors::{AnnError, Result};
use crate::label::tag::Tag;

/// How a list of predicates combines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLogic {
    /// Every predicate must hold.
    All,
    /// At least one predicate must hold.
    Any,
}

/// A comparison applied to the canonical string content of a tag.
#[derive(Debug, Clone)]
pub enum TagPredicate {
    /// Content equals the text (case sensitive).
    Exact(String),
    /// Content equals the text (case insensitive).
    IExact(String),
    /// Content starts with the text (case sensitive).
    StartsWith(String),
    /// Content starts with the text (case insensitive).
    IStartsWith(String),
    /// Content ends with the text (case sensitive).
    EndsWith(String),
    /// Content ends with the text (case insensitive).
    IEndsWith(String),
    /// Content contains the text (case sensitive).
    Contains(String),
    /// Content contains the text (case insensitive).
    IContains(String),
    /// Content matches the regular expression.
    Regex(Regex),
}

impl TagPredicate {
    /// Compile a regex predicate; an invalid pattern is a typed error.
    pub fn regex(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|_| AnnError::Type {
                value: pattern.to_owned(),
                expected: "valid regular expression",
            })
    }

    /// Whether the tag content satisfies the predicate.
    #[must_use]
    pub fn eval(&self, tag: &Tag) -> bool {
        let content = tag.content();
        match self {
            Self::Exact(t) => content == *t,
            Self::IExact(t) => content.to_lowercase() == t.to_lowercase(),
            Self::StartsWith(t) => content.starts_with(t),
            Self::IStartsWith(t) => content.to_lowercase().starts_with(&t.to_lowercase()),
            Self::EndsWith(t) => content.ends_with(t),
            Self::IEndsWith(t) => content.to_lowercase().ends_with(&t.to_lowercase()),
            Self::Contains(t) => content.contains(t),
            Self::IContains(t) => content.to_lowercase().contains(&t.to_lowercase()),
            Self::Regex(re) => re.is_match(&content),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn tag(s: &str) -> Tag {
        Tag::string(s)
    }

    #[test]
    fn exact() {
        assert!(TagPredicate::Exact("abc".into()).eval(&tag("abc")));
        assert!(!TagPredicate::Exact("ABC".into()).eval(&tag("abc")));
    }

    #[test]
    fn iexact() {
        assert!(TagPredicate::IExact("ABC".into()).eval(&tag("abc")));
        assert!(!TagPredicate::IExact("AAA".into()).eval(&tag("abc")));
    }

    #[test]
    fn startswith() {
        assert!(TagPredicate::StartsWith("a".into()).eval(&tag("abc")));
        assert!(!TagPredicate::StartsWith("b".into()).eval(&tag("abc")));
        assert!(TagPredicate::IStartsWith("A".into()).eval(&tag("abc")));
        assert!(!TagPredicate::IStartsWith("b".into()).eval(&tag("abc")));
    }

    #[test]
    fn endswith() {
        assert!(TagPredicate::EndsWith("c".into()).eval(&tag("abc")));
        assert!(!TagPredicate::EndsWith("b".into()).eval(&tag("abc")));
        assert!(TagPredicate::IEndsWith("C".into()).eval(&tag("abc")));
        assert!(!TagPredicate::IEndsWith("b".into()).eval(&tag("abc")));
    }

    #[test]
    fn contains() {
        assert!(TagPredicate::Contains("b".into()).eval(&tag("abc")));
        assert!(!TagPredicate::Contains("B".into()).eval(&tag("abc")));
        assert!(TagPredicate::IContains("B".into()).eval(&tag("abc")));
        assert!(!TagPredicate::IContains("d".into()).eval(&tag("abc")));
    }

    #[test]
    fn regexp() {
        assert!(TagPredicate::regex("^a[a-z]").unwrap().eval(&tag("abc")));
        assert!(!TagPredicate::regex("d").unwrap().eval(&tag("abc")));
    }

    #[test]
    fn invalid_regexp_is_typed_error() {
        assert_matches!(TagPredicate::regex("("), Err(AnnError::Type { .. }));
    }

    #[test]
    fn predicates_apply_to_canonical_content() {
        let t = Tag::integer(42);
        assert!(TagPredicate::Exact("42".into()).eval(&t));
        assert!(TagPredicate::StartsWith("4".into()).eval(&t));
    }
}
