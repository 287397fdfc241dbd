//! Audio metadata extraction
//!
//! Uses lofty to read tags and embedded cover art. The raw picture
//! payload is kept separate from the textual fields so the caller can
//! hand it to the art store.

use std::path::Path;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey};

use crate::database::NewSong;
use crate::error::{LibraryError, Result};

/// Metadata extracted from one audio file
#[derive(Debug, Clone, Default)]
pub struct SongMetadata {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub track_number: Option<String>,
    pub release_date: Option<String>,
    pub genre: Option<String>,
    pub duration_secs: i64,
    /// Raw embedded cover art, if present
    pub picture_data: Option<Vec<u8>>,
}

impl SongMetadata {
    /// Split into the row input and the art payload
    pub fn into_parts(self, path: &Path) -> (NewSong, Option<Vec<u8>>) {
        let song = NewSong {
            file_path: path.to_string_lossy().into_owned(),
            title: self.title,
            artist: self.artist,
            album: self.album,
            track_number: self.track_number,
            release_date: self.release_date,
            genre: self.genre,
            duration_secs: self.duration_secs,
            tags: None,
        };
        (song, self.picture_data)
    }
}

/// Extract metadata from an audio file
pub fn extract_metadata(path: &Path) -> Result<SongMetadata> {
    let tagged_file = Probe::open(path)
        .and_then(|probe| probe.read())
        .map_err(|source| LibraryError::Extraction {
            path: path.display().to_string(),
            source,
        })?;

    let duration = tagged_file.properties().duration();

    let mut metadata = SongMetadata {
        title: "Unknown Title".to_string(),
        artist: "Unknown Artist".to_string(),
        duration_secs: duration.as_secs() as i64,
        ..SongMetadata::default()
    };

    // Prefer the primary tag, fall back to any available tag
    if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
        if let Some(title) = tag.title() {
            metadata.title = title.to_string();
        }
        if let Some(artist) = tag.artist() {
            metadata.artist = artist.to_string();
        }
        metadata.album = tag.album().map(|a| a.to_string());
        metadata.track_number = tag.track().map(|t| t.to_string());
        metadata.genre = tag.genre().map(|g| g.to_string());

        // Full recording date where tagged, otherwise just the year
        metadata.release_date = tag
            .get_string(&ItemKey::RecordingDate)
            .map(str::to_string)
            .or_else(|| tag.year().map(|y| y.to_string()));

        if let Some(picture) = tag.pictures().first() {
            metadata.picture_data = Some(picture.data().to_vec());
        }
    }

    // Untitled files fall back to the file stem
    if metadata.title == "Unknown Title" {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            metadata.title = stem.to_string();
        }
    }

    Ok(metadata)
}

/// Minimal valid PCM WAV: RIFF header, fmt chunk, short data chunk
#[cfg(test)]
pub(crate) fn wav_bytes() -> Vec<u8> {
    let sample_rate: u32 = 44100;
    let samples = vec![0u8; 2048];

    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + samples.len() as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes()); // block align
    out.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    out.extend_from_slice(b"data");
    out.extend_from_slice(&(samples.len() as u32).to_le_bytes());
    out.extend_from_slice(&samples);
    out
}
