//! The top-level container: tiers, media, vocabularies and the hierarchy.

use serde::Serialize;
use tracing::debug;

use crate::annotation::Annotation;
use crate::ctrlvocab::CtrlVocab;
use crate::errors::{AnnError, HierarchyError, Result};
use crate::hierarchy::{self, Hierarchy, LinkType};
use crate::label::Label;
use crate::localization::Location;
use crate::media::Media;
use crate::metadata::Metadata;
use crate::tier::Tier;

/// An ordered collection of tiers with their shared resources.
///
/// The transcription owns the [`Hierarchy`]; every mutation that can break
/// a link constraint flows through transcription methods, which validate
/// the affected region and roll the edit back on violation. A bare
/// [`Tier`] never duplicates hierarchy logic.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcription {
    meta: Metadata,
    name: Option<String>,
    tiers: Vec<Tier>,
    media: Vec<Media>,
    vocabs: Vec<CtrlVocab>,
    hierarchy: Hierarchy,
}

impl Transcription {
    /// An empty, unnamed transcription.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty, named transcription.
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Self {
            name: Some(name.to_owned()),
            ..Self::default()
        }
    }

    // ── Identity ─────────────────────────────────────────────────────────

    /// The name, if one was given.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
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

    // ── Tiers ────────────────────────────────────────────────────────────

    /// Create an empty tier and return a mutable handle to it.
    pub fn create_tier(&mut self, name: &str) -> Result<&mut Tier> {
        let tier = Tier::new(name);
        self.append_tier(tier)?;
        Ok(self.tiers.last_mut().expect("tier just appended"))
    }

    /// Append a ready-made tier. Names are unique, case-insensitively.
    pub fn append_tier(&mut self, tier: Tier) -> Result<()> {
        if self.tier_index(tier.name()).is_some() {
            return Err(AnnError::DuplicateTier(tier.name().to_owned()));
        }
        self.tiers.push(tier);
        Ok(())
    }

    /// Remove a tier by name, dropping every hierarchy link touching it.
    pub fn remove_tier(&mut self, name: &str) -> Result<Tier> {
        let index = self
            .tier_index(name)
            .ok_or_else(|| AnnError::NoSuchTier(name.to_owned()))?;
        let tier = self.tiers.remove(index);
        self.hierarchy.remove_tier(tier.id());
        debug!(tier = tier.name(), "removed tier and its hierarchy links");
        Ok(tier)
    }

    /// Tier at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Tier> {
        self.tiers.get(index)
    }

    /// Tier by case-insensitive name.
    #[must_use]
    pub fn tier(&self, name: &str) -> Option<&Tier> {
        self.tier_index(name).map(|i| &self.tiers[i])
    }

    /// Mutable tier by case-insensitive name.
    ///
    /// Mutations done through this handle bypass hierarchy validation;
    /// use the transcription's annotation methods for hierarchy-safe
    /// edits.
    pub fn tier_mut(&mut self, name: &str) -> Option<&mut Tier> {
        let index = self.tier_index(name)?;
        Some(&mut self.tiers[index])
    }

    /// Index of a tier by case-insensitive name.
    #[must_use]
    pub fn tier_index(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.tiers
            .iter()
            .position(|t| t.name().to_lowercase() == wanted)
    }

    /// All tiers, in order.
    #[must_use]
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Iterate the tiers in order.
    pub fn iter(&self) -> impl Iterator<Item = &Tier> {
        self.tiers.iter()
    }

    /// Number of tiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Whether the transcription has no tier.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    // ── Media and vocabularies ───────────────────────────────────────────

    /// Register a media reference.
    pub fn add_media(&mut self, media: Media) {
        self.media.push(media);
    }

    /// All media references.
    #[must_use]
    pub fn media(&self) -> &[Media] {
        &self.media
    }

    /// Media by identifier.
    #[must_use]
    pub fn media_by_id(&self, id: &str) -> Option<&Media> {
        self.media.iter().find(|m| m.id() == id)
    }

    /// Register a controlled vocabulary.
    pub fn add_vocab(&mut self, vocab: CtrlVocab) {
        self.vocabs.push(vocab);
    }

    /// All vocabularies.
    #[must_use]
    pub fn vocabs(&self) -> &[CtrlVocab] {
        &self.vocabs
    }

    /// Vocabulary by name.
    #[must_use]
    pub fn vocab_by_name(&self, name: &str) -> Option<&CtrlVocab> {
        self.vocabs.iter().find(|v| v.name() == name)
    }

    // ── Hierarchy ────────────────────────────────────────────────────────

    /// The hierarchy graph.
    #[must_use]
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Register a hierarchy link between two tiers of this transcription.
    ///
    /// The full coverage constraint is checked first; on violation the
    /// link is not registered and the tiers are left unmodified.
    pub fn add_hierarchy_link(
        &mut self,
        link_type: LinkType,
        parent_name: &str,
        child_name: &str,
    ) -> Result<()> {
        let parent = self
            .tier(parent_name)
            .ok_or_else(|| HierarchyError::TierNotInTranscription(parent_name.to_owned()))?;
        let child = self
            .tier(child_name)
            .ok_or_else(|| HierarchyError::TierNotInTranscription(child_name.to_owned()))?;
        if parent.id() == child.id() {
            return Err(HierarchyError::SelfLink.into());
        }
        hierarchy::validate_link(link_type, parent, child)?;
        let parent_id = parent.id().to_owned();
        let child_id = child.id().to_owned();
        self.hierarchy.add(&parent_id, &child_id, link_type)?;
        debug!(%link_type, parent = parent_name, child = child_name, "hierarchy link added");
        Ok(())
    }

    // ── Hierarchy-checked mutations ──────────────────────────────────────

    /// Create an annotation on a tier, honoring its hierarchy links.
    ///
    /// The annotation is appended, the affected time range of every link
    /// of the tier is re-validated, and on violation the append is rolled
    /// back — the tier is left exactly as it was.
    pub fn create_annotation(
        &mut self,
        tier_name: &str,
        location: Location,
        labels: Vec<Label>,
    ) -> Result<usize> {
        let tier_index = self
            .tier_index(tier_name)
            .ok_or_else(|| AnnError::NoSuchTier(tier_name.to_owned()))?;
        let ann = Annotation::with_labels(location, labels);
        let span = (
            ann.start_point().midpoint(),
            ann.end_point().midpoint(),
        );
        let ann_index = self.tiers[tier_index].append(ann)?;
        if let Err(e) = self.validate_links_of(tier_index, span) {
            let _ = self.tiers[tier_index].remove(ann_index);
            return Err(e);
        }
        Ok(ann_index)
    }

    /// Replace the location of an annotation, honoring hierarchy links.
    ///
    /// Transactional at the single-annotation level: on any violation the
    /// previous location (and position) is restored.
    pub fn set_annotation_location(
        &mut self,
        tier_name: &str,
        ann_index: usize,
        location: Location,
    ) -> Result<()> {
        let tier_index = self
            .tier_index(tier_name)
            .ok_or_else(|| AnnError::NoSuchTier(tier_name.to_owned()))?;
        if self.tiers[tier_index].get(ann_index).is_none() {
            return Err(AnnError::EmptyResult("annotation lookup"));
        }

        let old = self.tiers[tier_index].remove(ann_index);
        let old_span = (old.start_point().midpoint(), old.end_point().midpoint());
        let mut edited = old.clone();
        edited.set_location(location);
        let new_span = (
            edited.start_point().midpoint(),
            edited.end_point().midpoint(),
        );
        let affected = (old_span.0.min(new_span.0), old_span.1.max(new_span.1));

        match self.tiers[tier_index].append(edited) {
            Ok(new_index) => {
                if let Err(e) = self.validate_links_of(tier_index, affected) {
                    let _ = self.tiers[tier_index].remove(new_index);
                    self.tiers[tier_index].insert_at(ann_index, old);
                    return Err(e);
                }
                Ok(())
            }
            Err(e) => {
                self.tiers[tier_index].insert_at(ann_index, old);
                Err(e)
            }
        }
    }

    /// Append a label to an annotation, honoring the tier's vocabulary.
    pub fn append_label(&mut self, tier_name: &str, ann_index: usize, label: Label) -> Result<()> {
        let tier_index = self
            .tier_index(tier_name)
            .ok_or_else(|| AnnError::NoSuchTier(tier_name.to_owned()))?;
        if let Some(vocab) = self.tiers[tier_index].ctrl_vocab() {
            for (tag, _) in label.iter() {
                if !tag.is_empty() && !vocab.contains(tag) {
                    return Err(AnnError::VocabMismatch {
                        vocab: vocab.name().to_owned(),
                        content: tag.content(),
                    });
                }
            }
        }
        match self.tiers[tier_index].get_mut(ann_index) {
            Some(ann) => {
                ann.append_label(label);
                Ok(())
            }
            None => Err(AnnError::EmptyResult("annotation lookup")),
        }
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn tier_by_id(&self, id: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.id() == id)
    }

    /// Re-validate every hierarchy link of the tier, restricted to the
    /// affected `[begin, end]` range for alignment links.
    fn validate_links_of(&self, tier_index: usize, span: (f64, f64)) -> Result<()> {
        let tier = &self.tiers[tier_index];
        let tier_id = tier.id().to_owned();

        if let Some((parent_id, link_type)) = self.hierarchy.parent_of(&tier_id) {
            if let Some(parent) = self.tier_by_id(parent_id) {
                match link_type {
                    LinkType::TimeAlignment => {
                        hierarchy::validate_alignment_range(parent, tier, span.0, span.1)?;
                    }
                    LinkType::TimeAssociation => {
                        hierarchy::validate_time_association(parent, tier)?;
                    }
                }
            }
        }
        for (child_id, link_type) in self.hierarchy.children_of(&tier_id) {
            if let Some(child) = self.tier_by_id(child_id) {
                match link_type {
                    LinkType::TimeAlignment => {
                        hierarchy::validate_alignment_range(tier, child, span.0, span.1)?;
                    }
                    LinkType::TimeAssociation => {
                        hierarchy::validate_time_association(tier, child)?;
                    }
                }
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
