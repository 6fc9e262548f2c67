//! Authentication error types.

use libris_core::error::LibrisError;
use thiserror::Error;

use crate::token::TokenError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("principal not found")]
    PrincipalNotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid or expired token: {0}")]
    InvalidOrExpiredToken(#[from] TokenError),

    #[error("no refresh session found")]
    NoSessionFound,

    #[error("refresh token reuse detected")]
    TokenReuseDetected,

    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(#[source] LibrisError),

    #[error("operation canceled")]
    OperationCanceled,

    #[error("cryptography error: {0}")]
    Crypto(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type AuthResult<T> = Result<T, AuthError>;
