//! # strata-core
//!
//! The temporal-annotation data model: named tiers of time-anchored
//! annotations, where every annotation carries one location (a fuzzy point,
//! an interval, or a disjoint union of intervals) and one or more labels,
//! each label being a scored set of alternative typed tags.
//!
//! This crate provides the shared vocabulary the format adapters and the
//! annotation pipeline stages depend on:
//!
//! - **Localization**: [`TimePoint`], [`TimeInterval`], [`TimeDisjoint`],
//!   [`Localization`], [`Location`] — radius-tolerant time anchors
//! - **Labels**: [`Tag`] (typed content), [`Label`] (scored alternatives),
//!   [`FuzzyPoint`] / [`FuzzyRect`] image-coordinate tag types
//! - **Containers**: [`Annotation`], [`Tier`], [`Transcription`]
//! - **Constraints**: [`Hierarchy`] with time-alignment / time-association
//!   links validated on every mutation
//! - **Support**: [`Metadata`] (ordered key/value store with generated ids),
//!   [`Media`], [`CtrlVocab`], [`SymbolTable`]
//! - **Errors**: [`AnnError`] hierarchy via `thiserror`
//!
//! ## Crate Position
//!
//! Foundation crate. `strata-formats` builds its adapters on top of it.

#![deny(unsafe_code)]

pub mod annotation;
pub mod annset;
pub mod ctrlvocab;
pub mod errors;
pub mod hierarchy;
pub mod label;
pub mod localization;
pub mod media;
pub mod metadata;
pub mod symbols;
pub mod tier;
pub mod transcription;

pub use annotation::Annotation;
pub use annset::AnnSet;
pub use ctrlvocab::CtrlVocab;
pub use errors::{AnnError, HierarchyError, Result};
pub use hierarchy::{Hierarchy, HierarchyLink, LinkType};
pub use label::compare::{MatchLogic, TagPredicate};
pub use label::fuzzy::{FuzzyPoint, FuzzyRect};
pub use label::tag::{Tag, TagContent};
pub use label::Label;
pub use localization::disjoint::TimeDisjoint;
pub use localization::interval::TimeInterval;
pub use localization::point::TimePoint;
pub use localization::{Localization, LocalizationKind, Location};
pub use media::Media;
pub use metadata::Metadata;
pub use symbols::{SymbolKind, SymbolTable};
pub use tier::Tier;
pub use transcription::Transcription;
