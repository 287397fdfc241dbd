//! Song row operations

use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::database::{NewSong, Song};
use crate::error::Result;

/// Insert a new song row, returns the new song id
///
/// Runs on a connection so import can hold it inside a transaction.
pub async fn insert_song(conn: &mut SqliteConnection, song: &NewSong, now: i64) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO songs (title, artist, album, track_number, release_date, genre, duration_secs, file_path, art_path, added_at, tags)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, '', ?, ?)
        "#,
    )
    .bind(&song.title)
    .bind(&song.artist)
    .bind(&song.album)
    .bind(&song.track_number)
    .bind(&song.release_date)
    .bind(&song.genre)
    .bind(song.duration_secs)
    .bind(&song.file_path)
    .bind(now)
    .bind(&song.tags)
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Record the stored album-art path on a row
pub async fn set_art_path(conn: &mut SqliteConnection, id: i64, art_path: &str) -> Result<()> {
    sqlx::query("UPDATE songs SET art_path = ? WHERE id = ?")
        .bind(art_path)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Total number of song rows
pub async fn count_songs(pool: &Pool<Sqlite>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM songs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Row at the given offset in id order
pub async fn song_at_offset(pool: &Pool<Sqlite>, offset: i64) -> Result<Option<Song>> {
    let song = sqlx::query_as::<_, Song>("SELECT * FROM songs ORDER BY id LIMIT 1 OFFSET ?")
        .bind(offset)
        .fetch_optional(pool)
        .await?;
    Ok(song)
}

/// Get song by id
pub async fn get_song(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Song>> {
    let song = sqlx::query_as::<_, Song>("SELECT * FROM songs WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(song)
}

/// Get song by file path
pub async fn get_song_by_path(pool: &Pool<Sqlite>, path: &str) -> Result<Option<Song>> {
    let song = sqlx::query_as::<_, Song>("SELECT * FROM songs WHERE file_path = ?")
        .bind(path)
        .fetch_optional(pool)
        .await?;
    Ok(song)
}

/// True iff a row's file path equals `path`
pub async fn song_exists(pool: &Pool<Sqlite>, path: &str) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM songs WHERE file_path = ?)")
        .bind(path)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

/// Bump a song's play counter
pub async fn increment_play_count(pool: &Pool<Sqlite>, id: i64) -> Result<()> {
    sqlx::query("UPDATE songs SET play_count = play_count + 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Bump a song's favorite counter
pub async fn increment_fave_count(pool: &Pool<Sqlite>, id: i64) -> Result<()> {
    sqlx::query("UPDATE songs SET fave_count = fave_count + 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
