//! Database module for track record persistence.
//!
//! Uses SQLx with SQLite for lightweight, embedded storage. The registry
//! only needs a key-value view of it: look a record up by recording code,
//! and upsert a complete record.
//!
//! # Example
//!
//! ```ignore
//! use track_registry::db::{init_db, SqliteTrackStore};
//!
//! let pool = init_db("sqlite:tracks.db").await?;
//! let store = SqliteTrackStore::new(pool);
//! let record = store.find("USMC18620549").await?;
//! ```

use async_trait::async_trait;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::model::TrackRecord;
use crate::registry::RegistryError;

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "tracks.db";

/// Build a SQLite database URL from an optional path.
///
/// If no path is provided, uses [`DEFAULT_DB_NAME`] in the current directory.
pub fn db_url(path: Option<&std::path::Path>) -> String {
    match path {
        Some(p) => format!("sqlite:{}", p.display()),
        None => format!("sqlite:{}", DEFAULT_DB_NAME),
    }
}

/// Initialize the database connection pool and run migrations.
///
/// Creates the database file if it doesn't exist, establishes a connection
/// pool with up to 5 connections, and runs all pending migrations.
///
/// # Errors
///
/// Returns an error if:
/// - Database creation fails
/// - Connection cannot be established
/// - Migration fails
pub async fn init_db(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    if !sqlx::Sqlite::database_exists(db_url).await.unwrap_or(false) {
        sqlx::Sqlite::create_database(db_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Persistence of track records keyed by recording code.
#[async_trait]
pub trait TrackStore: Send + Sync {
    /// Look up a record by recording code.
    async fn find(&self, recording_code: &str) -> Result<Option<TrackRecord>, RegistryError>;

    /// Insert or replace the record with the same recording code.
    ///
    /// Returns the record as stored.
    async fn upsert(&self, record: TrackRecord) -> Result<TrackRecord, RegistryError>;
}

/// Row shape of the `tracks` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct TrackRow {
    isrc: String,
    title: String,
    artist_name: String,
    album_name: String,
    album_id: String,
    is_explicit: bool,
    duration_seconds: i64,
    cover_location: String,
}

impl From<TrackRow> for TrackRecord {
    fn from(row: TrackRow) -> Self {
        Self {
            recording_code: row.isrc,
            title: row.title,
            artist_name: row.artist_name,
            album_name: row.album_name,
            album_id: row.album_id,
            is_explicit: row.is_explicit,
            duration_seconds: row.duration_seconds.max(0) as u64,
            cover_location: row.cover_location,
        }
    }
}

/// [`TrackStore`] backed by the SQLite `tracks` table.
#[derive(Clone)]
pub struct SqliteTrackStore {
    pool: SqlitePool,
}

impl SqliteTrackStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Number of registered tracks.
    pub async fn count(&self) -> Result<i64, RegistryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tracks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl TrackStore for SqliteTrackStore {
    async fn find(&self, recording_code: &str) -> Result<Option<TrackRecord>, RegistryError> {
        tracing::debug!(isrc = %recording_code, "Looking up track");
        let row = sqlx::query_as::<_, TrackRow>(
            "SELECT isrc, title, artist_name, album_name, album_id, is_explicit, \
             duration_seconds, cover_location FROM tracks WHERE isrc = ?",
        )
        .bind(recording_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TrackRecord::from))
    }

    async fn upsert(&self, record: TrackRecord) -> Result<TrackRecord, RegistryError> {
        tracing::debug!(isrc = %record.recording_code, "Saving track");
        let duration = i64::try_from(record.duration_seconds).unwrap_or(i64::MAX);

        let row = sqlx::query_as::<_, TrackRow>(
            r#"
            INSERT INTO tracks (isrc, title, artist_name, album_name, album_id,
                                is_explicit, duration_seconds, cover_location)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(isrc) DO UPDATE SET
                title = excluded.title,
                artist_name = excluded.artist_name,
                album_name = excluded.album_name,
                album_id = excluded.album_id,
                is_explicit = excluded.is_explicit,
                duration_seconds = excluded.duration_seconds,
                cover_location = excluded.cover_location
            RETURNING isrc, title, artist_name, album_name, album_id, is_explicit,
                      duration_seconds, cover_location
            "#,
        )
        .bind(&record.recording_code)
        .bind(&record.title)
        .bind(&record.artist_name)
        .bind(&record.album_name)
        .bind(&record.album_id)
        .bind(record.is_explicit)
        .bind(duration)
        .bind(&record.cover_location)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(isrc = %row.isrc, "Saved track");
        Ok(row.into())
    }
}
