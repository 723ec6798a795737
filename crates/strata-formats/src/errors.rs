//! Error types of the format layer.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, FormatError>;

/// Errors raised while dispatching, reading or writing annotated files.
#[derive(Debug, Error)]
pub enum FormatError {
    /// No adapter is registered for the file extension.
    #[error("unsupported file extension '{0}'")]
    UnsupportedExtension(String),

    /// The file content is not valid UTF-8 (or the declared encoding).
    #[error("encoding error in {path}: {detail}")]
    Encoding {
        /// File being read or written.
        path: PathBuf,
        /// What failed to decode.
        detail: String,
    },

    /// Malformed per-format syntax, reported with the offending line.
    #[error("parse error in {path} at line {line}: {detail}")]
    Parse {
        /// File being read.
        path: PathBuf,
        /// 1-based line number (0 when no line applies).
        line: usize,
        /// What was expected or found.
        detail: String,
    },

    /// The adapter has no reader or no writer.
    #[error("the {format} format has no {direction}")]
    NotImplemented {
        /// Adapter name.
        format: &'static str,
        /// "reader" or "writer".
        direction: &'static str,
    },

    /// Underlying file-system failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed structure surfaced by the data model (e.g. an interval
    /// whose end precedes its begin after parsing).
    #[error(transparent)]
    Data(#[from] strata_core::AnnError),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
