//! Core data models for the track registry.
//!
//! Defines the two shapes a track takes on its way into the store:
//! - [`FetchedTrack`] - metadata as returned by the catalog provider, no cover yet
//! - [`TrackRecord`] - the persisted entity, always carrying a cover location
//!
//! A record without a cover cannot be constructed: the only way to obtain a
//! [`TrackRecord`] from provider data is [`FetchedTrack::with_cover`].

use serde::Serialize;

use crate::registry::RegistryError;

/// Minimum length of a recording code accepted at the edge.
pub const MIN_CODE_LEN: usize = 12;
/// Maximum length of a recording code accepted at the edge.
pub const MAX_CODE_LEN: usize = 20;

/// Track metadata fetched from the catalog provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedTrack {
    /// Recording code (ISRC) this metadata was fetched for
    pub recording_code: String,
    /// Track title
    pub title: String,
    /// Primary artist name (first listed artist)
    pub artist_name: String,
    /// Album title
    pub album_name: String,
    /// Provider-scoped album ID, used to fetch the cover
    pub album_id: String,
    /// Whether the provider marks the track as explicit
    pub is_explicit: bool,
    /// Playback duration in whole seconds (truncated)
    pub duration_seconds: u64,
}

impl FetchedTrack {
    /// Attach the stored cover location, producing a complete record.
    pub fn with_cover(self, cover_location: impl Into<String>) -> TrackRecord {
        TrackRecord {
            recording_code: self.recording_code,
            title: self.title,
            artist_name: self.artist_name,
            album_name: self.album_name,
            album_id: self.album_id,
            is_explicit: self.is_explicit,
            duration_seconds: self.duration_seconds,
            cover_location: cover_location.into(),
        }
    }
}

/// A registered track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackRecord {
    /// Recording code (ISRC), the primary key
    pub recording_code: String,
    pub title: String,
    pub artist_name: String,
    pub album_name: String,
    /// Provider album ID at registration time
    pub album_id: String,
    pub is_explicit: bool,
    pub duration_seconds: u64,
    /// Where the cover image bytes were stored
    pub cover_location: String,
}

/// Result of a registration: the record and whether this call created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub record: TrackRecord,
    pub created: bool,
}

/// Convert a provider duration in milliseconds to whole seconds.
///
/// Truncates: 1999 ms is 1 second.
pub fn millis_to_seconds(duration_ms: u64) -> u64 {
    duration_ms / 1000
}

/// Validate a recording code as accepted from users.
///
/// Codes are 12 to 20 characters of uppercase ASCII letters, digits and hyphens.
pub fn validate_recording_code(code: &str) -> Result<(), RegistryError> {
    let len = code.chars().count();
    if !(MIN_CODE_LEN..=MAX_CODE_LEN).contains(&len) {
        return Err(RegistryError::InvalidCode(format!(
            "ISRC must be between {} and {} characters, got {}",
            MIN_CODE_LEN, MAX_CODE_LEN, len
        )));
    }

    if let Some(bad) = code
        .chars()
        .find(|c| !(c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(RegistryError::InvalidCode(format!(
            "ISRC must be alphanumeric (optionally with hyphens), found {:?}",
            bad
        )));
    }

    Ok(())
}
