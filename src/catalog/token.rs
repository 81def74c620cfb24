//! Provider access-token cache.
//!
//! Holds at most one bearer token together with the instant it stops being
//! served. All callers go through a single async lock covering
//! "check or acquire", so when the token has expired exactly one acquisition
//! request is in flight and late arrivals wait for its result.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::traits::TokenSource;
use super::{adapter, dto};
use crate::registry::RegistryError;

/// Subtracted from every granted lifetime so a token never expires mid-call.
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime assumed when the grant omits `expires_in`.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// A freshly granted credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantedToken {
    pub access_token: String,
    /// Lifetime as reported by the provider
    pub lifetime: Duration,
}

#[derive(Debug)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Expiry-aware cache in front of a [`TokenSource`].
pub struct TokenCache {
    source: Box<dyn TokenSource>,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    /// Create an empty cache acquiring tokens from `source`.
    pub fn new(source: impl TokenSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cached: Mutex::new(None),
        }
    }

    /// Return a valid token, acquiring a new one if none is cached or it expired.
    pub async fn get_token(&self) -> Result<String, RegistryError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref()
            && Instant::now() < token.expires_at
        {
            return Ok(token.value.clone());
        }

        // Never leave an expired token behind, whatever the outcome below
        *cached = None;

        tracing::info!("Fetching provider access token...");
        let granted = self.source.acquire().await?;
        if granted.access_token.trim().is_empty() {
            tracing::error!("Provider granted an empty access token");
            return Err(RegistryError::AuthFailure(
                "provider granted an empty access token".to_string(),
            ));
        }

        let now = Instant::now();
        let expires_at = now + granted.lifetime.saturating_sub(EXPIRY_MARGIN);
        tracing::info!(
            valid_for = ?expires_at.saturating_duration_since(now),
            "Provider access token fetched"
        );

        *cached = Some(CachedToken {
            value: granted.access_token.clone(),
            expires_at,
        });
        Ok(granted.access_token)
    }

    /// Drop the cached token if it is still `rejected`.
    ///
    /// A rejection that arrives after another caller already replaced the
    /// token leaves the newer token in place.
    pub async fn invalidate_if(&self, rejected: &str) {
        let mut cached = self.cached.lock().await;
        if cached.as_ref().is_some_and(|t| t.value == rejected) {
            *cached = None;
            tracing::debug!("Cached provider token invalidated");
        }
    }
}

/// Client-credentials grant against the provider's token endpoint.
pub struct HttpTokenSource {
    http_client: reqwest::Client,
    auth_url: String,
    client_id: String,
    client_secret: String,
}

impl HttpTokenSource {
    pub fn new(
        http_client: reqwest::Client,
        auth_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            auth_url: auth_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

#[async_trait]
impl TokenSource for HttpTokenSource {
    async fn acquire(&self) -> Result<GrantedToken, RegistryError> {
        let response = self
            .http_client
            .post(&self.auth_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| RegistryError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, "Failed to obtain provider access token");
            return Err(RegistryError::AuthFailure(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = response
            .json::<dto::TokenResponse>()
            .await
            .map_err(|e| RegistryError::AuthFailure(format!("malformed token response: {}", e)))?;

        adapter::to_granted_token(body)
    }
}
