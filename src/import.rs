//! Music import
//!
//! Handles:
//! - Single-file import (extract, persist art, insert row)
//! - Recursive folder scanning with duplicate skipping

pub mod metadata;

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::art::ArtStore;
use crate::database::Database;
use crate::error::{LibraryError, Result};

/// Supported audio file extensions
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "wav", "m4a", "ogg", "opus", "aac", "wma", "aiff",
];

/// Check if a file extension is a supported audio format
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Import one audio file into the library
///
/// Extracts metadata, inserts the row, and persists embedded album art
/// through the art store. Returns the new row id. Extraction and
/// persistence failures abort before/with the row write respectively.
pub async fn import_song(db: &Database, art: &ArtStore, path: &Path) -> Result<i64> {
    // Tag reading is blocking I/O, keep it off the async executor
    let extracted = {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || metadata::extract_metadata(&path)).await??
    };
    let (song, picture) = extracted.into_parts(path);
    db.import_song(song, picture.as_deref(), art).await
}

/// Outcome of a folder scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub imported: u64,
    pub skipped: u64,
    pub errors: u64,
}

/// Find audio files under `root`, in stable name order
pub fn discover_audio_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| is_audio_file(p))
        .collect()
}

/// Scan a directory and import every audio file not already in the library
///
/// Files the extractor cannot read are logged and counted, not fatal;
/// database and art-storage failures abort the scan.
pub async fn scan_and_import(db: &Database, art: &ArtStore, root: &Path) -> Result<ScanSummary> {
    let files = {
        let root = root.to_path_buf();
        tokio::task::spawn_blocking(move || discover_audio_files(&root)).await?
    };
    let mut summary = ScanSummary::default();

    for path in files {
        let path_str = path.to_string_lossy();
        if db.song_exists(&path_str).await? {
            summary.skipped += 1;
            continue;
        }

        match import_song(db, art, &path).await {
            Ok(id) => {
                summary.imported += 1;
                tracing::debug!(song_id = id, path = %path.display(), "imported song");
            }
            Err(err @ LibraryError::Extraction { .. }) => {
                summary.errors += 1;
                tracing::warn!(path = %path.display(), "skipping file: {err}");
            }
            Err(err) => return Err(err),
        }
    }

    tracing::info!(
        imported = summary.imported,
        skipped = summary.skipped,
        errors = summary.errors,
        "library scan finished"
    );
    Ok(summary)
}
