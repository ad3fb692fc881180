//! Domain-specific error types and error handling.

mod types;

pub use types::AuthError;

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Record store unavailable: {message}")]
    Store { message: String },

    #[error("Notification delivery failed: {message}")]
    Notification { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),
}

pub type DomainResult<T> = Result<T, DomainError>;
