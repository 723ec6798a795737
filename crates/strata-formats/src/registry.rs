//! Extension → adapter registry and the read/write dispatcher.
//!
//! The registry is the single entry point of the format layer: it maps a
//! case-insensitive file extension to its adapter, dispatches reads and
//! writes, and stamps provenance metadata on every operation. When the
//! extension is unknown, an optional content-sniffing heuristic tries each
//! adapter's `detect` in registration order and falls back to the raw-text
//! adapter.

use std::path::Path;

use tracing::debug;

use strata_core::Transcription;

use crate::adapter::FormatAdapter;
use crate::caps::Capabilities;
use crate::errors::{FormatError, Result};
use crate::text::{CsvAdapter, RawTextAdapter};
use crate::textgrid::TextGridAdapter;
use crate::xra::XraAdapter;

/// Registry of format adapters, ordered by registration.
///
/// Registration order matters to the heuristic: adapters with the most
/// discriminating `detect` come first, the raw-text fallback last.
pub struct FormatRegistry {
    adapters: Vec<Box<dyn FormatAdapter>>,
}

impl FormatRegistry {
    /// An empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Register an adapter. An adapter with the same default extension is
    /// replaced.
    pub fn register(&mut self, adapter: Box<dyn FormatAdapter>) {
        let ext = adapter.default_extension();
        self.adapters.retain(|a| a.default_extension() != ext);
        debug!(name = adapter.name(), ext, "registering format adapter");
        self.adapters.push(adapter);
    }

    /// Supported extensions, in registration order.
    #[must_use]
    pub fn extensions(&self) -> Vec<&'static str> {
        self.adapters
            .iter()
            .map(|a| a.default_extension())
            .collect()
    }

    /// Adapter for a case-insensitive extension.
    #[must_use]
    pub fn adapter_for(&self, extension: &str) -> Option<&dyn FormatAdapter> {
        let wanted = extension.trim_start_matches('.').to_lowercase();
        self.adapters
            .iter()
            .find(|a| a.default_extension() == wanted)
            .map(AsRef::as_ref)
    }

    /// Capability vector of a format, by extension.
    #[must_use]
    pub fn capabilities_of(&self, extension: &str) -> Option<Capabilities> {
        self.adapter_for(extension).map(FormatAdapter::capabilities)
    }

    /// Extensions whose format supports every capability the predicate
    /// requires — e.g. to list legal output formats for a disjoint tier.
    #[must_use]
    pub fn extensions_where(&self, predicate: impl Fn(Capabilities) -> bool) -> Vec<&'static str> {
        self.adapters
            .iter()
            .filter(|a| predicate(a.capabilities()))
            .map(|a| a.default_extension())
            .collect()
    }

    /// Read a file, selecting the adapter by extension.
    ///
    /// On success the transcription carries provenance metadata:
    /// `file_reader`, `file_name`, `file_path`, `file_ext` and
    /// `file_read_date`.
    pub fn read(&self, path: &Path) -> Result<Transcription> {
        let adapter = self.adapter_by_path(path)?;
        Self::read_with(adapter, path)
    }

    /// Read a file; when the extension is unknown, sniff the content with
    /// each adapter in turn and fall back to raw text.
    pub fn read_detecting(&self, path: &Path) -> Result<Transcription> {
        match self.adapter_by_path(path) {
            Ok(adapter) => Self::read_with(adapter, path),
            Err(FormatError::UnsupportedExtension(_)) => {
                let adapter = self
                    .adapters
                    .iter()
                    .find(|a| a.detect(path))
                    .map(AsRef::as_ref)
                    .or_else(|| self.adapter_for(RawTextAdapter::EXTENSION))
                    .ok_or_else(|| {
                        FormatError::UnsupportedExtension(extension_of(path).to_owned())
                    })?;
                debug!(adapter = adapter.name(), ?path, "format detected by heuristic");
                Self::read_with(adapter, path)
            }
            Err(e) => Err(e),
        }
    }

    /// Write a transcription, selecting the adapter by extension.
    ///
    /// The written copy carries provenance metadata (`file_writer`,
    /// `file_name`, `file_path`, `file_ext`, `file_write_date`) and an
    /// incremented `file_version`; the in-memory transcription is left
    /// untouched.
    pub fn write(&self, path: &Path, trs: &Transcription) -> Result<()> {
        let adapter = self.adapter_by_path(path)?;
        let mut copy = trs.clone();
        let meta = copy.meta_mut();
        meta.set("file_writer", adapter.name());
        meta.set("file_name", file_name_of(path));
        if !meta.contains_key("file_path") {
            // may have been assigned already, e.g. hidden by the caller
            meta.set("file_path", dir_of(path));
        }
        meta.set("file_ext", extension_of(path));
        meta.set("file_write_date", now());
        let version: u32 = meta.get_or("file_version", "0").parse().unwrap_or(0) + 1;
        meta.set("file_version", version.to_string());
        debug!(adapter = adapter.name(), ?path, version, "writing annotated file");
        adapter.write(path, &copy)
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn adapter_by_path(&self, path: &Path) -> Result<&dyn FormatAdapter> {
        let ext = extension_of(path);
        self.adapter_for(ext)
            .ok_or_else(|| FormatError::UnsupportedExtension(ext.to_owned()))
    }

    fn read_with(adapter: &dyn FormatAdapter, path: &Path) -> Result<Transcription> {
        debug!(adapter = adapter.name(), ?path, "reading annotated file");
        let mut trs = adapter.read(path)?;
        let meta = trs.meta_mut();
        meta.set("file_reader", adapter.name());
        meta.set("file_name", file_name_of(path));
        meta.set("file_path", dir_of(path));
        meta.set("file_ext", extension_of(path));
        meta.set("file_read_date", now());
        Ok(trs)
    }
}

impl Default for FormatRegistry {
    /// The standard registry: native format first, raw text last.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(XraAdapter));
        registry.register(Box::new(TextGridAdapter));
        registry.register(Box::new(CsvAdapter));
        registry.register(Box::new(RawTextAdapter));
        registry
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("extensions", &self.extensions())
            .finish()
    }
}

fn extension_of(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("")
}

fn file_name_of(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

fn dir_of(path: &Path) -> &str {
    path.parent().and_then(|p| p.to_str()).unwrap_or("")
}

fn now() -> String {
    chrono::Local::now().to_rfc3339()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
