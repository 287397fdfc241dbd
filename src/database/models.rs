//! Database models for persistent storage
//! These models map directly to the SQLite songs table

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Song row as stored in the database
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Song {
    /// Unique identifier (auto-increment, immutable once assigned)
    pub id: i64,
    /// Song title
    pub title: String,
    /// Artist name
    pub artist: String,
    /// Album name
    pub album: Option<String>,
    /// Track number, kept as text exactly as tagged
    pub track_number: Option<String>,
    /// Release date, kept as text exactly as tagged
    pub release_date: Option<String>,
    /// Genre
    pub genre: Option<String>,
    /// Duration in seconds
    pub duration_secs: i64,
    /// Source file path on disk (unique across rows)
    pub file_path: String,
    /// Album art file path, empty string when no art was stored
    pub art_path: String,
    /// Import timestamp (unix seconds)
    pub added_at: i64,
    /// Free-text tags
    pub tags: Option<String>,
    /// Play counter
    pub play_count: i64,
    /// Favorite counter
    pub fave_count: i64,
}

/// Input for creating a new song row
///
/// The id, art path, and import timestamp are assigned during import.
#[derive(Debug, Clone, Default)]
pub struct NewSong {
    pub file_path: String,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub track_number: Option<String>,
    pub release_date: Option<String>,
    pub genre: Option<String>,
    pub duration_secs: i64,
    pub tags: Option<String>,
}
