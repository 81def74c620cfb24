//! Trait definitions for the catalog provider seams.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses [`CatalogClient`](super::CatalogClient) and
//! [`HttpTokenSource`](super::token::HttpTokenSource), while tests can
//! substitute the implementations in [`mocks`].

use async_trait::async_trait;

use super::token::GrantedToken;
use crate::model::FetchedTrack;
use crate::registry::RegistryError;

/// Source of provider access tokens (the remote grant, without caching).
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Request a new credential from the provider.
    async fn acquire(&self) -> Result<GrantedToken, RegistryError>;
}

/// Catalog provider operations used by registration.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Look up track metadata by recording code.
    async fn fetch_metadata(&self, recording_code: &str) -> Result<FetchedTrack, RegistryError>;

    /// Download the first listed cover image of an album, verbatim.
    async fn fetch_cover_bytes(&self, album_id: &str) -> Result<Vec<u8>, RegistryError>;
}

#[async_trait]
impl CatalogProvider for super::CatalogClient {
    async fn fetch_metadata(&self, recording_code: &str) -> Result<FetchedTrack, RegistryError> {
        self.fetch_metadata(recording_code).await
    }

    async fn fetch_cover_bytes(&self, album_id: &str) -> Result<Vec<u8>, RegistryError> {
        self.fetch_cover_bytes(album_id).await
    }
}
