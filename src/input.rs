//! Input boundary: decide whether a selected file is an image at all.
//!
//! A file is accepted when its media type starts with `image/`. Like a
//! browser file picker, the media type comes from the file extension; the
//! contents are not read until the file has been accepted, and nothing is
//! decoded here.

use crate::error::{ResizeError, Result};
use std::path::Path;

/// Extension → media type, for the extensions the tool knows about.
const MEDIA_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("jfif", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("avif", "image/avif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("html", "text/html"),
    ("json", "application/json"),
    ("pdf", "application/pdf"),
];

const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Media type for a file name, from its extension.
pub fn media_type_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    ext.and_then(|ext| {
        MEDIA_TYPES
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, media_type)| *media_type)
    })
    .unwrap_or(UNKNOWN_MEDIA_TYPE)
}

pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// Reject anything whose media type is not `image/*`.
pub fn check_media_type(name: &str, media_type: &str) -> Result<()> {
    if is_image_media_type(media_type) {
        Ok(())
    } else {
        tracing::info!(file = name, media_type, "rejected non-image input");
        Err(ResizeError::InvalidInput {
            name: name.to_string(),
            media_type: media_type.to_string(),
        })
    }
}

/// A selected file that passed the media type check.
#[derive(Debug, Clone)]
pub struct InputFile {
    name: String,
    media_type: &'static str,
    bytes: Vec<u8>,
}

impl InputFile {
    /// Accept a file from disk. The file is only read once its type passed.
    pub fn open(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let media_type = media_type_for(&name);
        check_media_type(&name, media_type)?;
        let bytes = std::fs::read(path)?;
        tracing::debug!(file = %name, media_type, bytes = bytes.len(), "accepted input");
        Ok(Self {
            name,
            media_type,
            bytes,
        })
    }

    /// Accept in-memory contents under the given file name.
    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Result<Self> {
        let media_type = media_type_for(name);
        check_media_type(name, media_type)?;
        Ok(Self {
            name: name.to_string(),
            media_type,
            bytes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
