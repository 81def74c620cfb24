//! Cover store on the local filesystem.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::CoverStore;
use crate::registry::RegistryError;

/// File extension used for stored covers.
const COVER_EXT: &str = "jpg";

/// Distinguishes temp files of concurrent writes to the same key.
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Cover store writing one file per recording code.
pub struct DiskCoverStore {
    cover_dir: PathBuf,
    io_timeout: Duration,
}

impl DiskCoverStore {
    /// Create a store rooted at `cover_dir`.
    ///
    /// The directory is created lazily on first write.
    pub fn new(cover_dir: impl Into<PathBuf>, io_timeout: Duration) -> Self {
        Self {
            cover_dir: cover_dir.into(),
            io_timeout,
        }
    }

    /// Root directory of the store.
    pub fn cover_dir(&self) -> &Path {
        &self.cover_dir
    }

    /// Path a key is stored at.
    ///
    /// Keys must be plain file stems: no separators, no parent references.
    pub fn cover_path(&self, key: &str) -> Result<PathBuf, RegistryError> {
        if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
            return Err(RegistryError::StorageFailure(format!(
                "invalid cover key {:?}",
                key
            )));
        }
        Ok(self.cover_dir.join(format!("{}.{}", key, COVER_EXT)))
    }
}

/// Run a filesystem operation, failing with `TimedOut` after `limit`.
async fn with_timeout<T>(
    limit: Duration,
    op: impl Future<Output = io::Result<T>>,
) -> io::Result<T> {
    match tokio::time::timeout(limit, op).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("timed out after {:?}", limit),
        )),
    }
}

/// Unique sibling path for an in-progress write of `path`.
fn temp_path(path: &Path) -> PathBuf {
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}-{}.tmp", std::process::id(), seq));
    path.with_file_name(name)
}

#[async_trait]
impl CoverStore for DiskCoverStore {
    async fn write(&self, key: &str, bytes: &[u8]) -> Result<String, RegistryError> {
        let path = self.cover_path(key)?;

        let write = async {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            // Write aside, then rename into place
            let temp = temp_path(&path);
            if let Err(e) = tokio::fs::write(&temp, bytes).await {
                let _ = tokio::fs::remove_file(&temp).await;
                return Err(e);
            }
            if let Err(e) = tokio::fs::rename(&temp, &path).await {
                let _ = tokio::fs::remove_file(&temp).await;
                return Err(e);
            }
            std::path::absolute(&path)
        };

        let absolute = with_timeout(self.io_timeout, write).await.map_err(|e| {
            tracing::error!(isrc = %key, path = ?path, error = %e, "Failed to save cover");
            RegistryError::StorageFailure(e.to_string())
        })?;

        tracing::info!(isrc = %key, path = ?absolute, "Saved cover to disk");
        Ok(absolute.to_string_lossy().into_owned())
    }

    async fn read(&self, location: &str) -> Result<Vec<u8>, RegistryError> {
        with_timeout(self.io_timeout, tokio::fs::read(location))
            .await
            .map_err(|e| {
                tracing::error!(path = %location, error = %e, "Could not read cover");
                RegistryError::read_failure(location, e)
            })
    }
}
