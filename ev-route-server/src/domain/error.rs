//! Domain error types.
//!
//! These errors represent validation failures on station records. They are
//! distinct from storage and HTTP errors.

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Registration details cannot produce a usable station
    #[error("invalid registration: {0}")]
    InvalidRegistration(&'static str),

    /// Review rating outside 1..=5
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(i64),
}
