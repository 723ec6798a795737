//! Result sets of the tier filter system.

use crate::annotation::Annotation;
use crate::errors::Result;
use crate::tier::Tier;

/// A set of annotations, each carrying the string values that selected it.
///
/// Produced by tier filtering; two filter results over the same tier can be
/// intersected or merged, and a set can be turned back into a tier.
#[derive(Debug, Clone, Default)]
pub struct AnnSet {
    items: Vec<(Annotation, Vec<String>)>,
}

impl AnnSet {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an annotation with a value, merging values of duplicates.
    pub fn append(&mut self, ann: Annotation, value: String) {
        if let Some((_, values)) = self.items.iter_mut().find(|(a, _)| *a == ann) {
            if !values.contains(&value) {
                values.push(value);
            }
        } else {
            self.items.push((ann, vec![value]));
        }
    }

    /// Whether the annotation is in the set.
    #[must_use]
    pub fn contains(&self, ann: &Annotation) -> bool {
        self.items.iter().any(|(a, _)| a == ann)
    }

    /// Values attached to an annotation.
    #[must_use]
    pub fn values_of(&self, ann: &Annotation) -> Option<&[String]> {
        self.items
            .iter()
            .find(|(a, _)| a == ann)
            .map(|(_, v)| v.as_slice())
    }

    /// Annotations with their values.
    pub fn iter(&self) -> impl Iterator<Item = (&Annotation, &[String])> {
        self.items.iter().map(|(a, v)| (a, v.as_slice()))
    }

    /// Number of annotations in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the set has no annotation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Annotations present in both sets, with the values of both.
    #[must_use]
    pub fn intersection(&self, other: &AnnSet) -> AnnSet {
        let mut out = AnnSet::new();
        for (ann, values) in &self.items {
            if other.contains(ann) {
                for v in values {
                    out.append(ann.clone(), v.clone());
                }
                if let Some(other_values) = other.values_of(ann) {
                    for v in other_values {
                        out.append(ann.clone(), v.clone());
                    }
                }
            }
        }
        out
    }

    /// Annotations present in either set.
    #[must_use]
    pub fn union(&self, other: &AnnSet) -> AnnSet {
        let mut out = self.clone();
        for (ann, values) in &other.items {
            for v in values {
                out.append(ann.clone(), v.clone());
            }
        }
        out
    }

    /// Build a tier from the set.
    ///
    /// With `use_values` the annotation labels are replaced by the stored
    /// values; otherwise the original labels are kept. Metadata other than
    /// the id is carried over.
    pub fn to_tier(&self, name: &str, use_values: bool) -> Result<Tier> {
        let mut tier = Tier::new_with_overlaps(name);
        for (ann, values) in &self.items {
            let labels = if use_values {
                values
                    .iter()
                    .map(|v| crate::label::Label::new(crate::label::tag::Tag::string(v)))
                    .collect()
            } else {
                ann.labels().to_vec()
            };
            let index = tier.create_annotation(ann.location().clone(), labels)?;
            if let Some(new_ann) = tier.get_mut(index) {
                new_ann.meta_mut().absorb(ann.meta());
            }
        }
        Ok(tier)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
