//! Database repository - main entry point
//! Delegates to ops modules for actual operations

use std::path::Path;

use rand::Rng;
use sqlx::{Pool, Sqlite, sqlite::SqlitePoolOptions};

use super::{models::*, ops, schema};
use crate::art::{ArtStore, ImageType, detect_image_type};
use crate::error::{LibraryError, Result};

/// Database connection pool wrapper
///
/// The clock used for import timestamps is injected so tests can pin it;
/// the default is unix-epoch seconds.
#[derive(Debug)]
pub struct Database {
    pool: Pool<Sqlite>,
    clock: fn() -> i64,
}

impl Database {
    /// Create and initialize database at the given path
    pub async fn new(db_path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        // WAL keeps readers unblocked while an import is writing
        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&pool)
            .await?;
        sqlx::query("PRAGMA synchronous = NORMAL")
            .execute(&pool)
            .await?;

        schema::run_migrations(&pool).await?;

        Ok(Self {
            pool,
            clock: ops::current_timestamp,
        })
    }

    /// Create an in-memory database, mainly for tests and scratch use
    pub async fn open_in_memory() -> Result<Self> {
        // One connection, otherwise every pool checkout sees a fresh db
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        schema::run_migrations(&pool).await?;

        Ok(Self {
            pool,
            clock: ops::current_timestamp,
        })
    }

    /// Replace the import-timestamp clock
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Import a new song row, persisting its album art when present
    ///
    /// The row insert and the art-path update share one transaction, so a
    /// failed art write rolls the row back and leaves no partial import.
    /// A path that is already imported errors with
    /// [`LibraryError::DuplicateEntry`]. Returns the new row id.
    pub async fn import_song(
        &self,
        song: NewSong,
        picture: Option<&[u8]>,
        art: &ArtStore,
    ) -> Result<i64> {
        let now = (self.clock)();
        let mut tx = self.pool.begin().await?;

        let id = match ops::insert_song(&mut *tx, &song, now).await {
            Ok(id) => id,
            Err(LibraryError::Database(sqlx::Error::Database(db_err)))
                if db_err.is_unique_violation() =>
            {
                return Err(LibraryError::DuplicateEntry(song.file_path));
            }
            Err(err) => return Err(err),
        };

        if let Some(data) = picture {
            let image_type = detect_image_type(data);
            match art.default_art_path(id, image_type) {
                Some(art_path) => {
                    art.save(data, &art_path)?;
                    ops::set_art_path(&mut *tx, id, &art_path.to_string_lossy()).await?;
                }
                None => {
                    if image_type == ImageType::Unknown {
                        tracing::warn!(song_id = id, "unrecognized album art payload, not storing");
                    }
                }
            }
        }

        tx.commit().await?;
        Ok(id)
    }

    /// Total number of songs in the library
    pub async fn count(&self) -> Result<i64> {
        ops::count_songs(&self.pool).await
    }

    /// Uniformly random song from the library
    ///
    /// Errors with [`LibraryError::EmptyCollection`] when the table is
    /// empty, never with an out-of-range fetch.
    pub async fn random_song(&self) -> Result<Song> {
        let count = ops::count_songs(&self.pool).await?;
        if count == 0 {
            return Err(LibraryError::EmptyCollection);
        }
        let offset = rand::rng().random_range(0..count);
        self.song_at_offset(offset).await
    }

    /// [`Database::random_song`] with an explicit random source, for
    /// deterministic selection in tests
    pub async fn random_song_with<R: Rng>(&self, rng: &mut R) -> Result<Song> {
        let count = ops::count_songs(&self.pool).await?;
        if count == 0 {
            return Err(LibraryError::EmptyCollection);
        }
        let offset = rng.random_range(0..count);
        self.song_at_offset(offset).await
    }

    async fn song_at_offset(&self, offset: i64) -> Result<Song> {
        ops::song_at_offset(&self.pool, offset)
            .await?
            .ok_or(LibraryError::EmptyCollection)
    }

    /// True iff a song with this source file path exists
    pub async fn song_exists(&self, path: &str) -> Result<bool> {
        ops::song_exists(&self.pool, path).await
    }

    /// Errors with [`LibraryError::DuplicateEntry`] when a row for `path`
    /// already exists; succeeds silently otherwise
    pub async fn check_duplicate(&self, path: &str) -> Result<()> {
        if self.song_exists(path).await? {
            return Err(LibraryError::DuplicateEntry(path.to_string()));
        }
        Ok(())
    }

    pub async fn get_song(&self, id: i64) -> Result<Option<Song>> {
        ops::get_song(&self.pool, id).await
    }

    pub async fn get_song_by_path(&self, path: &str) -> Result<Option<Song>> {
        ops::get_song_by_path(&self.pool, path).await
    }

    pub async fn increment_play_count(&self, id: i64) -> Result<()> {
        ops::increment_play_count(&self.pool, id).await
    }

    pub async fn increment_fave_count(&self, id: i64) -> Result<()> {
        ops::increment_fave_count(&self.pool, id).await
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    const JPEG_PAYLOAD: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x01, 0x02, 0x03];

    fn fixed_clock() -> i64 {
        1_700_000_000
    }

    fn new_song(path: &str, title: &str) -> NewSong {
        NewSong {
            file_path: path.to_string(),
            title: title.to_string(),
            artist: "Test Artist".to_string(),
            duration_secs: 180,
            ..NewSong::default()
        }
    }

    async fn test_db() -> Database {
        Database::open_in_memory()
            .await
            .unwrap()
            .with_clock(fixed_clock)
    }

    #[tokio::test]
    async fn import_without_art_leaves_art_path_empty() {
        let db = test_db().await;
        let art = ArtStore::new(None);

        let id = db
            .import_song(new_song("/music/a.mp3", "Alpha"), None, &art)
            .await
            .unwrap();

        let song = db.get_song(id).await.unwrap().unwrap();
        assert_eq!(song.file_path, "/music/a.mp3");
        assert_eq!(song.art_path, "");
        assert_eq!(song.added_at, 1_700_000_000);
        assert_eq!(song.play_count, 0);
        assert_eq!(song.fave_count, 0);

        assert!(db.song_exists("/music/a.mp3").await.unwrap());
        assert!(!db.song_exists("/music/never-imported.mp3").await.unwrap());
        assert_eq!(db.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn import_with_art_stores_payload_and_records_path() {
        let dir = tempfile::tempdir().unwrap();
        let db = test_db().await;
        let art = ArtStore::new(Some(dir.path().to_path_buf()));

        let id = db
            .import_song(new_song("/music/b.mp3", "Beta"), Some(JPEG_PAYLOAD), &art)
            .await
            .unwrap();

        let song = db.get_song(id).await.unwrap().unwrap();
        let expected = dir.path().join("album-art").join(format!("{id}.jpg"));
        assert_eq!(song.art_path, expected.to_string_lossy());
        assert_eq!(std::fs::read(&expected).unwrap(), JPEG_PAYLOAD);
    }

    #[tokio::test]
    async fn import_with_art_but_no_static_root_skips_art() {
        let db = test_db().await;
        let art = ArtStore::new(None);

        let id = db
            .import_song(new_song("/music/c.mp3", "Gamma"), Some(JPEG_PAYLOAD), &art)
            .await
            .unwrap();

        let song = db.get_song(id).await.unwrap().unwrap();
        assert_eq!(song.art_path, "");
    }

    #[tokio::test]
    async fn import_with_unrecognized_art_payload_skips_art() {
        let dir = tempfile::tempdir().unwrap();
        let db = test_db().await;
        let art = ArtStore::new(Some(dir.path().to_path_buf()));

        let id = db
            .import_song(new_song("/music/d.mp3", "Delta"), Some(b"not an image".as_slice()), &art)
            .await
            .unwrap();

        let song = db.get_song(id).await.unwrap().unwrap();
        assert_eq!(song.art_path, "");
        assert!(!dir.path().join("album-art").exists());
    }

    #[tokio::test]
    async fn failed_art_write_rolls_back_the_row() {
        let dir = tempfile::tempdir().unwrap();
        // A plain file at the album-art path makes directory creation fail
        std::fs::write(dir.path().join("album-art"), b"in the way").unwrap();

        let db = test_db().await;
        let art = ArtStore::new(Some(dir.path().to_path_buf()));

        let result = db
            .import_song(new_song("/music/e.mp3", "Epsilon"), Some(JPEG_PAYLOAD), &art)
            .await;

        assert!(matches!(result, Err(LibraryError::Io(_))));
        assert_eq!(db.count().await.unwrap(), 0);
        assert!(!db.song_exists("/music/e.mp3").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_path_is_rejected() {
        let db = test_db().await;
        let art = ArtStore::new(None);

        db.import_song(new_song("/music/a.mp3", "Alpha"), None, &art)
            .await
            .unwrap();

        // Guard raises only when the path is found
        assert!(matches!(
            db.check_duplicate("/music/a.mp3").await,
            Err(LibraryError::DuplicateEntry(p)) if p == "/music/a.mp3"
        ));
        assert!(db.check_duplicate("/music/other.mp3").await.is_ok());

        // The UNIQUE constraint backs the guard up, with the same error
        let second = db
            .import_song(new_song("/music/a.mp3", "Alpha again"), None, &art)
            .await;
        assert!(matches!(
            second,
            Err(LibraryError::DuplicateEntry(p)) if p == "/music/a.mp3"
        ));
        assert_eq!(db.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn count_tracks_distinct_imports() {
        let db = test_db().await;
        let art = ArtStore::new(None);

        for i in 0..5 {
            db.import_song(new_song(&format!("/music/{i}.mp3"), "T"), None, &art)
                .await
                .unwrap();
        }
        assert_eq!(db.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn random_song_on_empty_table_errors() {
        let db = test_db().await;
        assert!(matches!(
            db.random_song().await,
            Err(LibraryError::EmptyCollection)
        ));
    }

    #[tokio::test]
    async fn random_song_returns_a_stored_row() {
        let db = test_db().await;
        let art = ArtStore::new(None);

        for i in 0..3 {
            db.import_song(new_song(&format!("/music/{i}.mp3"), "T"), None, &art)
                .await
                .unwrap();
        }

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let song = db.random_song_with(&mut rng).await.unwrap();
            assert!(db.song_exists(&song.file_path).await.unwrap());
        }

        // The ambient-rng variant also draws in range
        let song = db.random_song().await.unwrap();
        assert!(song.id >= 1);
    }

    #[tokio::test]
    async fn counters_are_monotonic() {
        let db = test_db().await;
        let art = ArtStore::new(None);

        let id = db
            .import_song(new_song("/music/a.mp3", "Alpha"), None, &art)
            .await
            .unwrap();

        db.increment_play_count(id).await.unwrap();
        db.increment_play_count(id).await.unwrap();
        db.increment_fave_count(id).await.unwrap();

        let song = db.get_song(id).await.unwrap().unwrap();
        assert_eq!(song.play_count, 2);
        assert_eq!(song.fave_count, 1);
    }

    #[tokio::test]
    async fn get_song_by_path_round_trips() {
        let db = test_db().await;
        let art = ArtStore::new(None);

        let id = db
            .import_song(new_song("/music/a.flac", "Alpha"), None, &art)
            .await
            .unwrap();

        let song = db.get_song_by_path("/music/a.flac").await.unwrap().unwrap();
        assert_eq!(song.id, id);
        assert_eq!(song.title, "Alpha");
        assert!(db.get_song_by_path("/music/missing.flac").await.unwrap().is_none());
    }
}
