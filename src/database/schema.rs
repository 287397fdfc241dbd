//! Database schema migrations

use sqlx::{Pool, Sqlite};

use crate::error::Result;

/// Run database migrations to create/update schema
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    // Songs table. file_path carries a UNIQUE constraint so duplicate
    // imports fail at the database even if the caller skips the guard.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            artist TEXT NOT NULL DEFAULT 'Unknown Artist',
            album TEXT,
            track_number TEXT,
            release_date TEXT,
            genre TEXT,
            duration_secs INTEGER NOT NULL DEFAULT 0,
            file_path TEXT NOT NULL UNIQUE,
            art_path TEXT NOT NULL DEFAULT '',
            added_at INTEGER NOT NULL,
            tags TEXT,
            play_count INTEGER NOT NULL DEFAULT 0,
            fave_count INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_songs_file_path ON songs(file_path);
        CREATE INDEX IF NOT EXISTS idx_songs_artist ON songs(artist);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
