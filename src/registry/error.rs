//! Error kinds surfaced by the registration core.

/// Errors that can occur while registering or looking up tracks.
///
/// Messages are captured as strings so errors can be cloned and replayed by
/// test doubles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Track not found with ISRC: {code}")]
    NotFound { code: String },

    #[error("No images found for album: {album_id}")]
    ImageUnavailable { album_id: String },

    #[error("Provider authentication failed: {0}")]
    AuthFailure(String),

    #[error("Music provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Could not store the image: {0}")]
    StorageFailure(String),

    #[error("Error reading image file {location}: {reason}")]
    ReadFailure { location: String, reason: String },

    #[error("Track store error: {0}")]
    Persistence(String),

    #[error("Invalid ISRC: {0}")]
    InvalidCode(String),
}

impl RegistryError {
    /// Create a not found error for a recording code.
    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    /// Create an image unavailable error for an album.
    pub fn image_unavailable(album_id: impl Into<String>) -> Self {
        Self::ImageUnavailable {
            album_id: album_id.into(),
        }
    }

    /// Create a read failure for a stored cover location.
    pub fn read_failure(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::ReadFailure {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error means "doesn't exist" rather than "couldn't ask".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::ImageUnavailable { .. })
    }

    /// HTTP status a REST front end conventionally answers with.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound { .. } | Self::ImageUnavailable { .. } => 404,
            Self::AuthFailure(_) | Self::ProviderUnavailable(_) | Self::StorageFailure(_) => 503,
            Self::ReadFailure { .. } | Self::Persistence(_) => 500,
            Self::InvalidCode(_) => 400,
        }
    }
}

impl From<sqlx::Error> for RegistryError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}
