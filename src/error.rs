//! Error types for library operations

use thiserror::Error;

/// Errors surfaced by the persistence layer
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Source file unreadable or unparseable by the tag reader
    #[error("failed to read tags from {path}: {source}")]
    Extraction {
        path: String,
        #[source]
        source: lofty::error::LoftyError,
    },

    /// A row for this file path already exists
    #[error("song already in library: {0}")]
    DuplicateEntry(String),

    /// A random pick was requested from an empty table
    #[error("no songs in the library")]
    EmptyCollection,

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem error (album art storage)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking worker task failed to complete
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result type for library operations
pub type Result<T> = std::result::Result<T, LibraryError>;
