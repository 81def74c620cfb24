//! Local cover image storage.
//!
//! Cover bytes are written once per recording code at a deterministic path
//! (`<cover_dir>/<code>.jpg`) and read back by the location string stored on
//! the track record. Bytes are kept verbatim; nothing is resized or re-encoded.

mod disk;

use async_trait::async_trait;

use crate::registry::RegistryError;

pub use disk::DiskCoverStore;

/// Storage of raw cover image bytes.
#[async_trait]
pub trait CoverStore: Send + Sync {
    /// Store `bytes` under `key`, returning the resulting location.
    ///
    /// Writing the same key again overwrites the previous content.
    async fn write(&self, key: &str, bytes: &[u8]) -> Result<String, RegistryError>;

    /// Read the bytes stored at a location previously returned by [`write`](Self::write).
    async fn read(&self, location: &str) -> Result<Vec<u8>, RegistryError>;
}
