//! Catalog provider integration - fetches track metadata and cover images.
//!
//! # Architecture
//!
//! Same separation as any external API in this crate:
//! - **DTOs** (`dto.rs`) - exact provider response shapes
//! - **Adapter** (`adapter.rs`) - converts DTOs to domain models
//! - **Token cache** (`token.rs`) - expiry-aware bearer token shared by all calls
//! - **Client** (`client.rs`) - HTTP client for the provider's Web API
//! - **Traits** (`traits.rs`) - seams for dependency injection and mocks
//!
//! ```ignore
//! use track_registry::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.provider)?;
//! let track = client.fetch_metadata("USMC18620549").await?;
//! let cover = client.fetch_cover_bytes(&track.album_id).await?;
//! ```

pub mod adapter;
mod client;
pub mod dto;
pub mod token;
pub mod traits;

pub use client::CatalogClient;
pub use token::{GrantedToken, HttpTokenSource, TokenCache};
pub use traits::{CatalogProvider, TokenSource};
