//! Global application error types.
//!
//! Token and identity-lookup failures are recovered inside the authentication
//! pipeline and never reach a client. `ServiceError` is what the
//! registration/login flows return and is mapped to HTTP in `api::common`.

use thiserror::Error;

/// Reasons a bearer token is rejected.
///
/// Only `Signing` can escape the token service; the others collapse to
/// `false` in `JwtService::is_valid`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token could not be parsed at all.
    #[error("Malformed token: {0}")]
    MalformedToken(String),
    /// The signature does not verify against the configured secret.
    #[error("Token signature is invalid")]
    SignatureInvalid,
    /// The token's expiry is at or before the evaluation time.
    #[error("Token has expired")]
    Expired,
    /// The token was issued for another subject.
    #[error("Token subject does not match identity")]
    SubjectMismatch,
    /// Encoding a new token failed.
    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Failures of the identity-lookup collaborator.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Identity not found")]
    NotFound,
    #[error("Identity store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// Generic service error that can be used across all entities
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{entity} already exists: {identifier}")]
    AlreadyExists { entity: String, identifier: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Database error: {source}")]
    Database {
        #[from]
        source: anyhow::Error,
    },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn already_exists(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

impl From<TokenError> for ServiceError {
    fn from(error: TokenError) -> Self {
        ServiceError::internal_error(error.to_string())
    }
}
