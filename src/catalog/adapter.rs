//! Adapter layer: Convert catalog provider DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.

use std::time::Duration;

use super::dto;
use super::token::{DEFAULT_TOKEN_LIFETIME, GrantedToken};
use crate::model::{FetchedTrack, millis_to_seconds};
use crate::registry::RegistryError;

/// Map a search response to the first matching track.
pub fn to_fetched_track(
    response: dto::SearchResponse,
    recording_code: &str,
) -> Result<FetchedTrack, RegistryError> {
    let item = response
        .tracks
        .and_then(|page| page.items.into_iter().next())
        .ok_or_else(|| RegistryError::not_found(recording_code))?;

    // Only the primary artist is kept
    let artist_name = item
        .artists
        .into_iter()
        .next()
        .map(|a| a.name)
        .unwrap_or_default();

    Ok(FetchedTrack {
        recording_code: recording_code.to_string(),
        title: item.name,
        artist_name,
        album_name: item.album.name,
        album_id: item.album.id,
        is_explicit: item.explicit,
        duration_seconds: millis_to_seconds(item.duration_ms),
    })
}

/// Pick the address of the first listed cover image.
pub fn first_image_url(
    response: dto::AlbumResponse,
    album_id: &str,
) -> Result<String, RegistryError> {
    response
        .images
        .into_iter()
        .next()
        .map(|image| image.url)
        .ok_or_else(|| RegistryError::image_unavailable(album_id))
}

/// Validate a token grant and extract its lifetime.
pub fn to_granted_token(response: dto::TokenResponse) -> Result<GrantedToken, RegistryError> {
    let access_token = response
        .access_token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            RegistryError::AuthFailure("token response missing access_token".to_string())
        })?;

    let lifetime = match response.expires_in {
        Some(secs) => Duration::from_secs(secs.max(0) as u64),
        None => DEFAULT_TOKEN_LIFETIME,
    };

    Ok(GrantedToken {
        access_token,
        lifetime,
    })
}
