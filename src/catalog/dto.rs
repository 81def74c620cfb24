//! Catalog provider API Data Transfer Objects
//!
//! These types match what the provider's Web API returns (Spotify-style
//! search, album and client-credentials token endpoints).
//! DO NOT use these types outside the catalog module - convert to domain types
//! in `adapter.rs`.

use serde::{Deserialize, Serialize};

/// Client-credentials token response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    /// Bearer token; missing or empty means the grant is unusable
    pub access_token: Option<String>,
    /// Usually "Bearer"
    pub token_type: Option<String>,
    /// Lifetime in seconds
    pub expires_in: Option<i64>,
}

/// Response of `GET /v1/search?type=track`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    /// Track page; absent when the provider returns no track section
    pub tracks: Option<TrackPage>,
}

/// One page of track search results
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<TrackItem>,
    pub total: Option<u64>,
}

/// A track in search results
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackItem {
    /// Provider track ID
    pub id: Option<String>,
    /// Track title
    pub name: String,
    #[serde(default)]
    pub explicit: bool,
    /// Duration in milliseconds
    #[serde(default)]
    pub duration_ms: u64,
    pub album: AlbumSummary,
    /// Credited artists, primary first
    #[serde(default)]
    pub artists: Vec<ArtistSummary>,
}

/// Album as embedded in a track item
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlbumSummary {
    pub id: String,
    pub name: String,
}

/// Artist as embedded in a track item
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistSummary {
    pub id: Option<String>,
    pub name: String,
}

/// Response of `GET /v1/albums/{id}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlbumResponse {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Cover images, widest first
    #[serde(default)]
    pub images: Vec<Image>,
}

/// A cover image reference
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

/// Error envelope returned on non-success statuses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub status: Option<u16>,
    pub message: Option<String>,
}
