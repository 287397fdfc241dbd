//! Persistence layer for a personal music library
//!
//! Stores song metadata in SQLite via sqlx, extracts tags and embedded
//! cover art from audio files with lofty, and writes album art under a
//! configured static-asset root.

mod art;
mod config;
mod database;
mod error;
mod import;

pub use art::{ArtStore, ImageType, detect_image_type};
pub use config::LibraryConfig;
pub use database::{Database, NewSong, Song};
pub use error::{LibraryError, Result};
pub use import::{
    AUDIO_EXTENSIONS, ScanSummary, discover_audio_files, import_song, is_audio_file,
    scan_and_import,
};
pub use import::metadata::{SongMetadata, extract_metadata};
