//! # strata-formats
//!
//! Multi-format reader/writer layer for the annotation data model.
//!
//! Every supported file format is a [`FormatAdapter`] translating its
//! foreign temporal model into a [`strata_core::Transcription`] and back.
//! The [`FormatRegistry`] maps file extensions to adapters, dispatches
//! reads and writes with provenance stamping, and exposes each format's
//! [`Capabilities`] so callers can check what a destination format can
//! represent before writing to it.
//!
//! Formats:
//!
//! - **XRA** ([`XraAdapter`]) — the native XML schema, capability-complete,
//!   the reference round-trip format
//! - **TextGrid** ([`TextGridAdapter`]) — Praat interval and point tiers
//! - **CSV** ([`CsvAdapter`]) — one `tier,begin,end,text` row per annotation
//! - **Raw text** ([`RawTextAdapter`]) — line-per-annotation fallback

#![deny(unsafe_code)]

pub mod adapter;
pub mod caps;
pub mod errors;
pub mod registry;
pub mod text;
pub mod textgrid;
pub mod xra;

pub use adapter::FormatAdapter;
pub use caps::Capabilities;
pub use errors::{FormatError, Result};
pub use registry::FormatRegistry;
pub use text::{CsvAdapter, RawTextAdapter};
pub use textgrid::TextGridAdapter;
pub use xra::XraAdapter;
