//! Track registration core.
//!
//! [`RegistrationService`] composes the track store, the catalog provider and
//! the cover store into three operations: register, look up, read cover.
//! All failures surface as a [`RegistryError`] with their kind preserved.

mod error;
mod service;

pub use error::RegistryError;
pub use service::RegistrationService;
