//! Album art storage
//!
//! Writes embedded cover art to a configured static-asset root, with
//! image type sniffed from the payload rather than any file extension.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::LibraryConfig;
use crate::error::Result;

/// Image type recognized from a raw payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Jpg,
    Png,
    Unknown,
}

impl ImageType {
    /// Canonical file extension, or `None` for unrecognized payloads
    pub fn extension(self) -> Option<&'static str> {
        match self {
            ImageType::Jpg => Some("jpg"),
            ImageType::Png => Some("png"),
            ImageType::Unknown => None,
        }
    }
}

/// Sniff an image payload's type from its signature bytes
pub fn detect_image_type(data: &[u8]) -> ImageType {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        ImageType::Jpg
    } else if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        ImageType::Png
    } else {
        ImageType::Unknown
    }
}

/// Writes album art files under `<static_root>/album-art/`
#[derive(Debug, Clone)]
pub struct ArtStore {
    static_root: Option<PathBuf>,
}

impl ArtStore {
    /// Create a store rooted at the given static-asset directory.
    /// With `None`, art persistence is disabled and no paths are produced.
    pub fn new(static_root: Option<PathBuf>) -> Self {
        Self { static_root }
    }

    pub fn from_config(config: &LibraryConfig) -> Self {
        Self::new(config.static_folder_path.clone())
    }

    /// Storage path for a song's art: `<static_root>/album-art/<id>.<ext>`
    ///
    /// Returns `None` when no static root is configured or the image type
    /// was not recognized.
    pub fn default_art_path(&self, song_id: i64, image_type: ImageType) -> Option<PathBuf> {
        let root = self.static_root.as_ref()?;
        let ext = image_type.extension()?;
        Some(root.join("album-art").join(format!("{song_id}.{ext}")))
    }

    /// Write an art payload, creating missing parent directories and
    /// overwriting any existing file at `path`
    pub fn save(&self, data: &[u8], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }
}
