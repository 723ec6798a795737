//! The contract every format adapter implements.

use std::path::Path;

use strata_core::Transcription;

use crate::caps::Capabilities;
use crate::errors::Result;

/// A reader/writer translating one foreign file format into the common
/// annotation model and back.
///
/// Adapters are stateless: `read` builds a fresh [`Transcription`] and
/// `write` serializes a borrowed one. The underlying file handle is scoped
/// to the call and released on every exit path. An adapter missing a
/// reader or writer returns [`FormatError::NotImplemented`].
///
/// [`FormatError::NotImplemented`]: crate::errors::FormatError::NotImplemented
pub trait FormatAdapter {
    /// Short adapter name, stamped as read/write provenance.
    fn name(&self) -> &'static str;

    /// The software this format originates from.
    fn software(&self) -> &'static str;

    /// Default file extension, lowercase, without the dot.
    fn default_extension(&self) -> &'static str;

    /// What the format can represent.
    fn capabilities(&self) -> Capabilities;

    /// Parse the file into a transcription.
    fn read(&self, path: &Path) -> Result<Transcription>;

    /// Serialize the transcription into the file.
    fn write(&self, path: &Path, trs: &Transcription) -> Result<()>;

    /// Best-effort content sniffing: whether the file looks like this
    /// format. Never errors; unreadable files are simply not detected.
    fn detect(&self, path: &Path) -> bool;
}
