//! Media file references attached to tiers and transcriptions.

use serde::Serialize;

use crate::metadata::Metadata;

/// Generic representation of a media file.
///
/// The mime type is guessed from the file extension when not given;
/// unknown extensions fall back to `audio/basic`.
#[derive(Debug, Clone, Serialize)]
pub struct Media {
    meta: Metadata,
    url: String,
    mime: String,
}

fn guess_mime(url: &str) -> &'static str {
    let ext = url.rsplit('.').next().unwrap_or_default().to_lowercase();
    match ext.as_str() {
        "wav" => "audio/x-wav",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "audio/basic",
    }
}

impl Media {
    /// A media reference with a guessed mime type.
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            meta: Metadata::new(),
            url: url.to_owned(),
            mime: guess_mime(url).to_owned(),
        }
    }

    /// A media reference with an explicit mime type.
    #[must_use]
    pub fn with_mime(url: &str, mime: &str) -> Self {
        Self {
            meta: Metadata::new(),
            url: url.to_owned(),
            mime: mime.to_owned(),
        }
    }

    /// Assign a caller-chosen identifier (e.g. the id read from a file).
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.meta.set(crate::metadata::ID_KEY, id);
        self
    }

    /// The identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.meta.id()
    }

    /// The URL of the media.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The mime type.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime
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
}

impl PartialEq for Media {
    /// Strict identity: url, mime and every metadata entry (id included).
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url && self.mime == other.mime && self.meta == other.meta
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
