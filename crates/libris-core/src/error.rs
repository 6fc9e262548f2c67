//! Error types for the Libris system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibrisError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LibrisError {
    /// Returns `true` for the "row does not exist" case, as opposed to
    /// a storage or transport failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LibrisError::NotFound { .. })
    }
}

pub type LibrisResult<T> = Result<T, LibrisError>;
