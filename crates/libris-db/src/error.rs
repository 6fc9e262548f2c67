//! Database-specific error types and conversions.

use libris_core::error::LibrisError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Invalid row: {0}")]
    InvalidRow(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity}")]
    AlreadyExists { entity: String },

    /// Optimistic transaction conflict. The statement can be retried.
    #[error("Write conflict: {0}")]
    Conflict(String),
}

impl DbError {
    /// Classify a query or statement error.
    pub(crate) fn from_statement(entity: &str, err: surrealdb::Error) -> Self {
        Self::classify(entity, err.to_string())
    }

    /// Unique index violations surface as "already contains" errors. Write
    /// conflicts between concurrent transactions ask to be retried.
    fn classify(entity: &str, message: String) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("already contains") {
            DbError::AlreadyExists {
                entity: entity.into(),
            }
        } else if lower.contains("transaction conflict")
            || lower.contains("retry the transaction")
            || lower.contains("can be retried")
        {
            DbError::Conflict(message)
        } else {
            DbError::Query(message)
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, DbError::Conflict(_))
    }
}

impl From<DbError> for LibrisError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => LibrisError::NotFound { entity, id },
            DbError::AlreadyExists { entity } => LibrisError::AlreadyExists { entity },
            other => LibrisError::Database(other.to_string()),
        }
    }
}
