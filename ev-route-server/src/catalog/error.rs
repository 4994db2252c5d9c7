//! Catalog error types.

use crate::domain::{DomainError, RegistrationId, StationId};

/// Errors from reading or changing the station catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// No station with this id
    #[error("station {0} not found")]
    StationNotFound(StationId),

    /// No pending registration with this id
    #[error("registration {0} not found")]
    RegistrationNotFound(RegistrationId),

    /// Submitted data failed validation
    #[error(transparent)]
    Invalid(#[from] DomainError),

    /// Reading or writing the catalog file failed
    #[error("persistence error: {message}")]
    Persist { message: String },
}
