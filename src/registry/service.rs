//! Registration service - orchestrates track registration and lookups.
//!
//! Registration of a new code runs these steps, in this order:
//! 1. Check the track store; an existing record is returned as-is
//! 2. Fetch metadata from the catalog provider
//! 3. Fetch the album cover bytes from the provider
//! 4. Write the cover to the cover store
//! 5. Upsert the complete record
//!
//! The record is written last, so a failure in any step leaves the store
//! untouched. A failure between 4 and 5 can leave an orphaned cover file; it
//! is overwritten by the next registration of the same code.
//!
//! Concurrent first registrations of the same code are not coordinated: both
//! may fetch, the cover path and bytes are the same, and the last upsert wins.

use std::sync::Arc;

use super::RegistryError;
use crate::catalog::CatalogProvider;
use crate::db::TrackStore;
use crate::model::{RegistrationOutcome, TrackRecord};
use crate::storage::CoverStore;

/// Registers tracks by recording code and serves stored data.
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn TrackStore>,
    provider: Arc<dyn CatalogProvider>,
    covers: Arc<dyn CoverStore>,
}

impl RegistrationService {
    pub fn new(
        store: Arc<dyn TrackStore>,
        provider: Arc<dyn CatalogProvider>,
        covers: Arc<dyn CoverStore>,
    ) -> Self {
        Self {
            store,
            provider,
            covers,
        }
    }

    /// Register a track, fetching it from the provider only if unknown.
    ///
    /// Returns `created = false` with the stored record when the code is
    /// already registered; no remote calls are made in that case.
    pub async fn register(&self, recording_code: &str) -> Result<RegistrationOutcome, RegistryError> {
        if recording_code.trim().is_empty() {
            return Err(RegistryError::InvalidCode("ISRC code is required".to_string()));
        }

        if let Some(existing) = self.store.find(recording_code).await? {
            tracing::info!(isrc = %recording_code, "Track already registered, returning existing");
            return Ok(RegistrationOutcome {
                record: existing,
                created: false,
            });
        }

        tracing::info!(isrc = %recording_code, "Registering new track");

        let fetched = self.provider.fetch_metadata(recording_code).await?;
        let cover = self.provider.fetch_cover_bytes(&fetched.album_id).await?;
        let location = self.covers.write(recording_code, &cover).await?;

        let record = self.store.upsert(fetched.with_cover(location)).await?;

        tracing::info!(
            isrc = %recording_code,
            title = %record.title,
            "Track registered successfully"
        );
        Ok(RegistrationOutcome {
            record,
            created: true,
        })
    }

    /// Return the stored record for a recording code.
    pub async fn get_by_code(&self, recording_code: &str) -> Result<TrackRecord, RegistryError> {
        self.find_or_not_found(recording_code).await
    }

    /// Return the stored cover bytes for a recording code.
    ///
    /// A record whose cover file has disappeared is reported as a read
    /// failure, not repaired.
    pub async fn get_cover_bytes(&self, recording_code: &str) -> Result<Vec<u8>, RegistryError> {
        let record = self.find_or_not_found(recording_code).await?;
        self.covers.read(&record.cover_location).await
    }

    async fn find_or_not_found(&self, recording_code: &str) -> Result<TrackRecord, RegistryError> {
        self.store.find(recording_code).await?.ok_or_else(|| {
            tracing::error!(isrc = %recording_code, "Track not found");
            RegistryError::not_found(recording_code)
        })
    }
}
