//! Catalog provider HTTP client
//!
//! Talks to a Spotify-style Web API:
//! - `GET {base}/v1/search?q=isrc:{code}&type=track` for metadata
//! - `GET {base}/v1/albums/{id}` for the album's image list
//! - a plain `GET` of the chosen image URL for the bytes
//!
//! Every API call carries a bearer token from the shared [`TokenCache`].
//! Image downloads go to the provider's CDN and are sent unauthenticated.

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::token::{HttpTokenSource, TokenCache};
use super::{adapter, dto};
use crate::config::ProviderConfig;
use crate::model::FetchedTrack;
use crate::registry::RegistryError;

/// User agent sent with every request
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Catalog provider API client
pub struct CatalogClient {
    http_client: reqwest::Client,
    base_url: String,
    tokens: TokenCache,
}

impl CatalogClient {
    /// Create a client from provider settings.
    ///
    /// The underlying HTTP client enforces `request_timeout_secs` on every
    /// request, token grants included.
    pub fn new(config: &ProviderConfig) -> Result<Self, RegistryError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RegistryError::ProviderUnavailable(e.to_string()))?;

        let source = HttpTokenSource::new(
            http_client.clone(),
            &config.auth_url,
            &config.client_id,
            &config.client_secret,
        );

        Ok(Self::from_parts(
            http_client,
            &config.api_base_url,
            TokenCache::new(source),
        ))
    }

    /// Assemble a client from an HTTP client, API base URL and token cache.
    pub fn from_parts(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        tokens: TokenCache,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Look up track metadata by recording code.
    pub async fn fetch_metadata(&self, recording_code: &str) -> Result<FetchedTrack, RegistryError> {
        let url = format!(
            "{}/v1/search?q={}&type=track",
            self.base_url,
            urlencoding::encode(&format!("isrc:{}", recording_code))
        );

        let response: dto::SearchResponse = self
            .get_json(&url, || RegistryError::not_found(recording_code))
            .await?;

        let track = adapter::to_fetched_track(response, recording_code).inspect_err(|_| {
            tracing::warn!(isrc = %recording_code, "Track not found at provider");
        })?;

        tracing::debug!(isrc = %recording_code, title = %track.title, "Fetched metadata from provider");
        Ok(track)
    }

    /// Download the first listed cover image of an album.
    pub async fn fetch_cover_bytes(&self, album_id: &str) -> Result<Vec<u8>, RegistryError> {
        let url = format!(
            "{}/v1/albums/{}",
            self.base_url,
            urlencoding::encode(album_id)
        );

        let album: dto::AlbumResponse = self
            .get_json(&url, || RegistryError::image_unavailable(album_id))
            .await?;

        let image_url = adapter::first_image_url(album, album_id).inspect_err(|_| {
            tracing::warn!(album_id = %album_id, "Album lists no images");
        })?;

        tracing::info!(album_id = %album_id, "Fetching cover image");
        self.download(&image_url, || RegistryError::image_unavailable(album_id))
            .await
    }

    /// Authenticated GET returning a decoded JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        absent: impl FnOnce() -> RegistryError,
    ) -> Result<T, RegistryError> {
        let token = self.tokens.get_token().await?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            // Rejected token: drop it so the next operation acquires a fresh one
            self.tokens.invalidate_if(&token).await;
        }

        let response = check_status(response, absent).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| RegistryError::ProviderUnavailable(format!("invalid response: {}", e)))
    }

    /// Plain GET returning the body verbatim.
    async fn download(
        &self,
        url: &str,
        absent: impl FnOnce() -> RegistryError,
    ) -> Result<Vec<u8>, RegistryError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response, absent).await?;

        let data = response.bytes().await.map_err(transport_error)?;
        Ok(data.to_vec())
    }
}

/// Map a failed send or body read to a domain error.
fn transport_error(e: reqwest::Error) -> RegistryError {
    if e.is_timeout() {
        RegistryError::ProviderUnavailable(format!("request timed out: {}", e))
    } else {
        RegistryError::ProviderUnavailable(e.to_string())
    }
}

/// Translate non-success statuses into domain errors.
async fn check_status(
    response: reqwest::Response,
    absent: impl FnOnce() -> RegistryError,
) -> Result<reqwest::Response, RegistryError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(absent());
    }

    // Prefer the provider's own message when it sends one
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<dto::ApiError>(&body)
        .ok()
        .and_then(|e| e.error.message)
        .unwrap_or_else(|| body.chars().take(200).collect());

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(RegistryError::AuthFailure(format!("HTTP {}: {}", status, detail)));
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(RegistryError::ProviderUnavailable(
            "rate limited - try again later".to_string(),
        ));
    }

    Err(RegistryError::ProviderUnavailable(format!(
        "HTTP {}: {} - {}",
        status,
        status.canonical_reason().unwrap_or("Unknown"),
        detail
    )))
}
