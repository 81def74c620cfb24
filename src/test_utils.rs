//! Test utilities and fixtures for track-registry tests.
//!
//! This module provides common test helpers, in-memory collaborators and
//! small helpers for `wiremock` provider stubs to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use track_registry::test_utils::{temp_db, mock_track_record};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (pool, _dir) = temp_db().await;
//!     let record = mock_track_record();
//!     // ... test logic
//! }
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use sqlx::sqlite::SqlitePool;
use tempfile::TempDir;
use wiremock::{Request, ResponseTemplate};

use crate::db::TrackStore;
use crate::model::{FetchedTrack, TrackRecord};
use crate::registry::RegistryError;
use crate::storage::CoverStore;

/// Creates a temporary database for testing.
///
/// Keep the returned `TempDir` alive for the duration of your test; the
/// database is deleted when it goes out of scope.
pub async fn temp_db() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");
    let db_url = format!("sqlite:{}", db_path.display());

    let pool = crate::db::init_db(&db_url)
        .await
        .expect("Failed to initialize test database");

    (pool, dir)
}

/// Metadata the provider returns for `USMC18620549`.
pub fn mock_fetched_track() -> FetchedTrack {
    FetchedTrack {
        recording_code: "USMC18620549".to_string(),
        title: "Test Track".to_string(),
        artist_name: "Test Artist".to_string(),
        album_name: "Test Album".to_string(),
        album_id: "album-123".to_string(),
        is_explicit: false,
        duration_seconds: 180,
    }
}

/// A complete record for `USMC18620549`.
///
/// Customize with struct update syntax:
///
/// ```ignore
/// let custom = TrackRecord {
///     title: "Custom".to_string(),
///     ..mock_track_record()
/// };
/// ```
pub fn mock_track_record() -> TrackRecord {
    mock_fetched_track().with_cover("/covers/USMC18620549.jpg")
}

// ============================================================================
// In-memory collaborators
// ============================================================================

/// Track store kept in a map.
#[derive(Default)]
pub struct MemoryTrackStore {
    records: Mutex<HashMap<String, TrackRecord>>,
    fail_next_upsert: AtomicBool,
}

impl MemoryTrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Make the next upsert fail with a persistence error.
    pub fn fail_next_upsert(&self) {
        self.fail_next_upsert.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl TrackStore for MemoryTrackStore {
    async fn find(&self, recording_code: &str) -> Result<Option<TrackRecord>, RegistryError> {
        Ok(self.records.lock().get(recording_code).cloned())
    }

    async fn upsert(&self, record: TrackRecord) -> Result<TrackRecord, RegistryError> {
        if self.fail_next_upsert.swap(false, Ordering::SeqCst) {
            return Err(RegistryError::Persistence("database is locked".to_string()));
        }
        self.records
            .lock()
            .insert(record.recording_code.clone(), record.clone());
        Ok(record)
    }
}

/// Cover store kept in a map, with locations shaped like `mem://covers/<key>.jpg`.
#[derive(Default)]
pub struct MemoryCoverStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
    writes: AtomicUsize,
    fail_writes: bool,
}

impl MemoryCoverStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose writes always fail.
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Delete a stored file out-of-band.
    pub fn remove(&self, location: &str) {
        self.files.lock().remove(location);
    }
}

#[async_trait]
impl CoverStore for MemoryCoverStore {
    async fn write(&self, key: &str, bytes: &[u8]) -> Result<String, RegistryError> {
        if self.fail_writes {
            return Err(RegistryError::StorageFailure("No space left on device".to_string()));
        }
        let location = format!("mem://covers/{}.jpg", key);
        self.files.lock().insert(location.clone(), bytes.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(location)
    }

    async fn read(&self, location: &str) -> Result<Vec<u8>, RegistryError> {
        self.files
            .lock()
            .get(location)
            .cloned()
            .ok_or_else(|| RegistryError::read_failure(location, "No such file or directory"))
    }
}

// ============================================================================
// Provider stubs
// ============================================================================

/// Base URL nothing can listen on; connecting fails immediately.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:0";

/// A JSON response with the given status.
pub fn json_response(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.as_bytes().to_vec(), "application/json")
}

/// Value of a header on a recorded request, if present and readable.
pub fn header_value<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_temp_db_creates_working_database() {
        let (pool, _dir) = temp_db().await;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tracks")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_mock_track_record_defaults() {
        let record = mock_track_record();
        assert_eq!(record.recording_code, "USMC18620549");
        assert_eq!(record.duration_seconds, 180);
        assert!(record.cover_location.contains("USMC18620549"));
    }

    #[tokio::test]
    async fn test_json_response_and_header_value() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(json_response(200, r#"{"ok": true}"#))
            .mount(&server)
            .await;

        let response = reqwest::Client::new()
            .get(format!("{}/ping", server.uri()))
            .bearer_auth("t")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );

        let requests = server.received_requests().await.unwrap();
        assert_eq!(header_value(&requests[0], "authorization"), Some("Bearer t"));
        assert_eq!(header_value(&requests[0], "x-missing"), None);
    }

    #[tokio::test]
    async fn test_memory_cover_store_roundtrip() {
        let store = MemoryCoverStore::new();
        let location = store.write("USMC18620549", &[1, 2]).await.unwrap();
        assert_eq!(store.read(&location).await.unwrap(), vec![1, 2]);
        store.remove(&location);
        assert!(store.read(&location).await.is_err());
    }
}
